//! Deterministic random number generation for terrain.
//!
//! RULE: nothing in the core calls a platform RNG. Random maps are a pure
//! function of their seed so a generated map can be reproduced exactly.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::ops::Range;

/// Seed mixing constant (golden ratio), keeps small adjacent seeds apart.
const SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct TerrainRng {
    inner: Pcg64Mcg,
}

impl TerrainRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed.wrapping_mul(SEED_MIX)),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll an integer in `range` (half-open). An empty range yields its start.
    pub fn next_i32_in(&mut self, range: Range<i32>) -> i32 {
        if range.end <= range.start {
            return range.start;
        }
        let span = (range.end as i64 - range.start as i64) as u64;
        (range.start as i64 + (self.inner.next_u64() % span) as i64) as i32
    }
}
