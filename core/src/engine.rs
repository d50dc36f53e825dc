//! The round engine: the heart of the replay.
//!
//! STATE MACHINE:
//!   current_round_index == 0            initial roster, nothing applied
//!   0 < current_round_index < total     rounds [0, idx) applied
//!   current_round_index == total        terminal
//!
//! RULES:
//!   - Rounds are applied in document order, one at a time.
//!   - Actions within a round are applied in list order, never batched.
//!   - A failing action is logged and skipped; the round still completes.
//!   - After every advance the roster is captured into the snapshot store.
//!   - Going back restores a snapshot; it never re-simulates.

use crate::{
    error::{BattleError, BattleResult},
    event::BattleEvent,
    interpreter::apply_action,
    model::{GameData, GameRound, Roster, SoldierCatalog},
    snapshot::SnapshotStore,
    types::RoundNumber,
};

#[derive(Debug, Clone, PartialEq)]
pub enum RoundOutcome {
    Advanced {
        round_number: RoundNumber,
        events:       Vec<BattleEvent>,
        /// Actions rejected by the interpreter.
        skipped:      usize,
    },
    /// Already terminal. Nothing changed.
    AtEnd,
}

pub struct RoundEngine {
    rounds:              Vec<GameRound>,
    roster:              Roster,
    current_round_index: usize,
    snapshots:           SnapshotStore,
    spawn_errors:        Vec<BattleError>,
}

impl RoundEngine {
    /// Engine over an already-built roster. Captures snapshot 0.
    pub fn new(roster: Roster, rounds: Vec<GameRound>) -> Self {
        let mut snapshots = SnapshotStore::new();
        snapshots.capture(&roster);
        Self {
            rounds,
            roster,
            current_round_index: 0,
            snapshots,
            spawn_errors: Vec::new(),
        }
    }

    /// Spawn the document's initial roster against `catalog` and build an
    /// engine over its playable rounds.
    ///
    /// Soldiers with no catalog entry are skipped; see [`Self::spawn_errors`].
    pub fn load(data: &GameData, catalog: &SoldierCatalog) -> BattleResult<Self> {
        let (roster, spawn_errors) = Roster::spawn(data.initial_soldiers(), catalog)?;
        let mut engine = Self::new(roster, data.playable_rounds());
        engine.spawn_errors = spawn_errors;
        log::info!(
            "engine: loaded {} rounds, {} soldiers ({} catalog types)",
            engine.total_rounds(),
            engine.roster.len(),
            catalog.len()
        );
        Ok(engine)
    }

    /// Apply the next round. A no-op returning `AtEnd` once terminal.
    pub fn advance_one_round(&mut self) -> RoundOutcome {
        let Some(round) = self.rounds.get(self.current_round_index) else {
            return RoundOutcome::AtEnd;
        };
        let round_number = round.round_number;
        log::info!("Processing Round {round_number}");

        let mut events = Vec::new();
        let mut skipped = 0;
        for (i, action) in round.actions.iter().enumerate() {
            if let Err(e) = apply_action(&mut self.roster, action, &mut events) {
                skipped += 1;
                log::warn!("round={round_number} action {i} ({}) skipped: {e}", action.action_type);
            }
        }

        self.current_round_index += 1;

        // Snapshot i already exists when the round is replayed after a step
        // back; replay is deterministic so it holds the same roster.
        if self.snapshots.len() == self.current_round_index {
            self.snapshots.capture(&self.roster);
        } else {
            debug_assert_eq!(
                self.snapshots.get(self.current_round_index),
                Some(&self.roster),
                "replayed round diverged from its snapshot"
            );
        }

        events.push(BattleEvent::RoundProcessed { round_number });
        RoundOutcome::Advanced { round_number, events, skipped }
    }

    /// Replace the live roster with snapshot `index` and move the cursor there.
    pub fn rewind_to(&mut self, index: usize) -> BattleResult<()> {
        self.roster = self.snapshots.restore(index)?;
        self.current_round_index = index;
        log::debug!("engine: rewound to round index {index}");
        Ok(())
    }

    pub fn current_round_index(&self) -> usize {
        self.current_round_index
    }

    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_at_end(&self) -> bool {
        self.current_round_index >= self.rounds.len()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn rounds(&self) -> &[GameRound] {
        &self.rounds
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// `MissingConfig` errors for soldiers skipped at load.
    pub fn spawn_errors(&self) -> &[BattleError] {
        &self.spawn_errors
    }
}
