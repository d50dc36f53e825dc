//! Roster snapshots: one per round boundary.
//!
//! Snapshot `i` is the roster after round `i` has been applied; snapshot
//! 0 is the initial roster. Snapshots are structural clones, so stepping
//! back is a restore, never a re-simulation.
//!
//! The store is append-only: nothing is overwritten, dropped or compacted.
//! Growth is bounded by the round count.

use crate::{
    error::{BattleError, BattleResult},
    model::Roster,
};

pub type SnapshotId = usize;

#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: Vec<Roster>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a deep copy of `roster`. Returns its index.
    pub fn capture(&mut self, roster: &Roster) -> SnapshotId {
        self.snapshots.push(roster.clone());
        let id = self.snapshots.len() - 1;
        log::debug!("snapshot {id} captured ({} soldiers)", roster.len());
        id
    }

    /// A fresh copy of snapshot `index`; the stored one stays untouched.
    pub fn restore(&self, index: SnapshotId) -> BattleResult<Roster> {
        self.snapshots
            .get(index)
            .cloned()
            .ok_or(BattleError::IndexOutOfRange { index, len: self.snapshots.len() })
    }

    pub fn get(&self, index: SnapshotId) -> Option<&Roster> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
