//! Deterministic food placement over the free cells of the arena.

use std::collections::HashSet;

use grid_arcade_core::{GridCoord, GridSize};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Deterministic sampler that picks uniformly random free cells for food.
#[derive(Clone, Debug)]
pub(crate) struct FoodSpawner {
    rng_state: u64,
}

impl FoodSpawner {
    pub(crate) const fn new(seed: u64) -> Self {
        Self { rng_state: seed }
    }

    /// Picks a uniformly random cell outside the occupied set with a single
    /// draw over the enumerated free cells, or `None` when every cell is
    /// taken.
    pub(crate) fn reposition(
        &mut self,
        size: GridSize,
        occupied: &HashSet<GridCoord>,
    ) -> Option<GridCoord> {
        let mut free = Vec::new();
        for row in 0..size.rows() {
            for column in 0..size.columns() {
                let cell = GridCoord::new(column, row);
                if !occupied.contains(&cell) {
                    free.push(cell);
                }
            }
        }
        if free.is_empty() {
            return None;
        }

        let pick = (self.advance_rng() % free.len() as u64) as usize;
        free.get(pick).copied()
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }
}
