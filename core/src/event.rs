//! Battle events: everything the presentation layer is told about.
//!
//! RULE: the core never touches visuals. Every visible change to the
//! roster is announced as a BattleEvent and routed to a BattleObserver.

use crate::{
    model::SoldierStats,
    types::{Position, RoundNumber, RunId, SoldierId},
};
use serde::{Deserialize, Serialize};

/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEvent {
    // ── Roster lifecycle ───────────────────────────
    SoldierSpawned {
        soldier_id: SoldierId,
    },
    /// All visuals must be torn down; spawns follow.
    RosterCleared,

    // ── Action effects ─────────────────────────────
    SoldierMoved {
        soldier_id: SoldierId,
        position:   Position,
    },
    SoldierStatsChanged {
        soldier_id: SoldierId,
        stats:      SoldierStats,
    },
    SoldierDefeated {
        soldier_id: SoldierId,
    },
    /// Transient hit effect on the attacked soldier.
    DamageEffect {
        soldier_id: SoldierId,
    },
    AbilityCast {
        caster_id:       SoldierId,
        ability:         String,
        target_position: Position,
    },

    // ── Round boundary ─────────────────────────────
    RoundProcessed {
        round_number: RoundNumber,
    },
}

impl BattleEvent {
    /// Stable name used for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SoldierSpawned { .. }      => "soldier_spawned",
            Self::RosterCleared              => "roster_cleared",
            Self::SoldierMoved { .. }        => "soldier_moved",
            Self::SoldierStatsChanged { .. } => "soldier_stats_changed",
            Self::SoldierDefeated { .. }     => "soldier_defeated",
            Self::DamageEffect { .. }        => "damage_effect",
            Self::AbilityCast { .. }         => "ability_cast",
            Self::RoundProcessed { .. }      => "round_processed",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    /// Playback cursor after the step that produced the event.
    pub round:      usize,
    pub event_type: String,
    pub payload:    String, // JSON-serialized BattleEvent
}

impl EventLogEntry {
    pub fn from_event(run_id: &str, round: usize, event: &BattleEvent) -> serde_json::Result<Self> {
        Ok(Self {
            id:         None,
            run_id:     run_id.to_string(),
            round,
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(event)?,
        })
    }
}
