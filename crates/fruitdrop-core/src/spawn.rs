//! Spawn controller with deterministic level selection.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::GameError;
use crate::level::{LevelIndex, LevelTable};

#[derive(Debug, Clone)]
pub struct SpawnController {
    rng: ChaCha8Rng,
    pool: usize,
    bin_left: f32,
    bin_right: f32,
}

impl SpawnController {
    pub fn new(seed: u64, pool: usize, bin_left: f32, bin_right: f32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            pool,
            bin_left,
            bin_right,
        }
    }

    /// Draws a level uniformly from the lowest `pool` tiers.
    #[allow(clippy::cast_possible_truncation)]
    pub fn pick_next_level(&mut self, levels: &LevelTable) -> LevelIndex {
        let eligible = self.pool.min(levels.len()).max(1);
        self.rng.random_range(0..eligible) as LevelIndex
    }

    /// Clamps a requested x so a fruit of `level` does not overlap a wall.
    pub fn drop_position(
        &self,
        levels: &LevelTable,
        requested_x: f32,
        level: LevelIndex,
    ) -> Result<f32, GameError> {
        let radius = levels.radius(level)?;
        let min = self.bin_left + radius;
        let max = self.bin_right - radius;
        Ok(requested_x.max(min).min(max))
    }
}
