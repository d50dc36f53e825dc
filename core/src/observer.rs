//! Presentation callbacks.
//!
//! The presentation layer owns its own id → visual cache and keeps it in
//! sync only through these callbacks. Every method defaults to a no-op so
//! a sink implements just what it draws.

use crate::{
    event::BattleEvent,
    types::{Position, RoundNumber, SoldierId},
};

pub trait BattleObserver {
    fn on_soldier_spawned(&mut self, _id: SoldierId) {}

    fn on_soldier_stats_changed(&mut self, _id: SoldierId) {}

    fn on_soldier_defeated(&mut self, _id: SoldierId) {}

    fn on_soldier_moved(&mut self, _id: SoldierId, _position: Position) {}

    fn on_ability_cast(&mut self, _caster_id: SoldierId, _ability: &str, _target_position: Position) {}

    fn on_round_processed(&mut self, _round_number: RoundNumber) {}

    fn on_damage_effect(&mut self, _id: SoldierId) {}

    /// Drop every visual; a full respawn follows.
    fn on_roster_cleared(&mut self) {}

    /// Route one event to its callback. Recording sinks override this.
    fn on_event(&mut self, event: &BattleEvent) {
        match event {
            BattleEvent::SoldierSpawned { soldier_id }         => self.on_soldier_spawned(*soldier_id),
            BattleEvent::RosterCleared                         => self.on_roster_cleared(),
            BattleEvent::SoldierMoved { soldier_id, position } => self.on_soldier_moved(*soldier_id, *position),
            BattleEvent::SoldierStatsChanged { soldier_id, .. } => self.on_soldier_stats_changed(*soldier_id),
            BattleEvent::SoldierDefeated { soldier_id }        => self.on_soldier_defeated(*soldier_id),
            BattleEvent::DamageEffect { soldier_id }           => self.on_damage_effect(*soldier_id),
            BattleEvent::AbilityCast { caster_id, ability, target_position } => {
                self.on_ability_cast(*caster_id, ability, *target_position)
            }
            BattleEvent::RoundProcessed { round_number }       => self.on_round_processed(*round_number),
        }
    }
}

/// Observer that records every event in order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Drain everything recorded so far.
    pub fn take(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl BattleObserver for EventLog {
    fn on_event(&mut self, event: &BattleEvent) {
        self.events.push(event.clone());
    }
}
