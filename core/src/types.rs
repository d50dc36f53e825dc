//! Shared primitive types used across the entire replay core.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable soldier identifier. Unique within a battle, never reused.
pub type SoldierId = i32;

/// The round number as authored in the battle document.
pub type RoundNumber = i32;

/// The canonical run identifier for a recorded replay.
pub type RunId = String;

/// A point in map space. Serialized as `{"x":..,"y":..,"z":..}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}
