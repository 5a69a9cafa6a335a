//! Decaying knowledge of where the opponent was last seen.
//!
//! A sighting seeds `contact_dist = 1, contact_age = 1` at its epicenter.
//! Each turn the reached area grows by one hop and every cell already
//! reached ages by one, so a small distance paired with a large age is an
//! old, weak signal.

use alloc::vec::Vec;

use crate::engine::common::{Coordinate, GridError};
use crate::engine::grid::Grid;

#[derive(Debug, Default, Clone)]
pub struct DetectionTracker {
    reset_this_turn: bool,
}

impl DetectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once a sighting has wiped the previous contact fields this turn.
    pub fn reset_this_turn(&self) -> bool {
        self.reset_this_turn
    }

    /// Record an opponent seen at `coord` with strength `size`.
    ///
    /// The first sighting of a turn discards all older contact history.
    /// Sightings on obstacles or with zero size carry no information and are
    /// ignored. Returns whether the sighting was applied.
    pub fn register_sighting(
        &mut self,
        grid: &mut Grid,
        coord: Coordinate,
        size: u32,
    ) -> Result<bool, GridError> {
        let idx = grid.index_of(coord)?;
        if size == 0 || grid.cells()[idx].is_blocked() {
            return Ok(false);
        }

        if !self.reset_this_turn {
            self.reset_this_turn = true;
            for cell in grid.cells_mut() {
                cell.contact_dist = 0;
                cell.contact_age = 0;
            }
        }

        let cell = &mut grid.cells_mut()[idx];
        cell.occupant_size = cell.occupant_size.max(size);
        cell.contact_dist = 1;
        cell.contact_age = 1;
        Ok(true)
    }

    /// Age every reached cell by one turn and extend the reach by one hop.
    ///
    /// Parents are the cells reached before this pass, visited nearest
    /// first so a newly reached cell inherits the smallest parent distance.
    pub fn advance_turn(&mut self, grid: &mut Grid) {
        for cell in grid.cells_mut() {
            cell.visited = false;
        }

        let mut parents: Vec<(u32, usize)> = grid
            .cells()
            .iter()
            .filter(|c| c.contact_dist > 0)
            .map(|c| (c.contact_dist, c.index()))
            .collect();
        parents.sort_by_key(|&(dist, _)| dist);

        let mut neighbors = Vec::with_capacity(4);
        for (parent_dist, idx) in parents {
            {
                let cell = &mut grid.cells_mut()[idx];
                if !cell.visited {
                    cell.visited = true;
                    cell.contact_age += 1;
                }
            }

            neighbors.clear();
            neighbors.extend(grid.neighbor_indices(idx));
            for &next in &neighbors {
                let cell = &mut grid.cells_mut()[next];
                if cell.visited || cell.is_blocked() {
                    continue;
                }
                if cell.contact_dist == 0 {
                    cell.contact_dist = parent_dist + 1;
                }
                cell.contact_age += 1;
                cell.visited = true;
            }
        }

        self.reset_this_turn = false;
    }
}
