//! Breadth-first hop-count propagation over a [`Grid`].
//!
//! The same field serves two purposes: distance to the roaming destination
//! and the set of cells a torpedo can reach. Hop counts follow the four
//! axis-aligned directions and never pass through blocked cells.

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

use crate::engine::common::{Coordinate, GridError};
use crate::engine::grid::Grid;

/// Minimum hop count from a seed to every reachable cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    seed: usize,
    dist: Vec<Option<u32>>,
    reached: Vec<usize>,
}

impl DistanceField {
    /// Propagate from `seed`. With `max_hops`, expansion stops after that
    /// many waves and [`reached`](Self::reached) holds exactly the cells
    /// settled within range.
    pub fn propagate(
        grid: &Grid,
        seed: Coordinate,
        max_hops: Option<u32>,
    ) -> Result<Self, GridError> {
        let seed_idx = grid.index_of(seed)?;
        let mut dist = vec![None; grid.len()];
        let mut reached = Vec::new();
        dist[seed_idx] = Some(0);
        reached.push(seed_idx);

        // a blocked seed is never a hop source
        if grid.cells()[seed_idx].is_blocked() {
            return Ok(Self {
                seed: seed_idx,
                dist,
                reached,
            });
        }

        let mut frontier = VecDeque::new();
        frontier.push_back(seed_idx);
        while let Some(idx) = frontier.pop_front() {
            let hops = match dist[idx] {
                Some(d) => d,
                None => continue,
            };
            if max_hops.is_some_and(|max| hops >= max) {
                continue;
            }
            for next in grid.neighbor_indices(idx) {
                if dist[next].is_some() || grid.cells()[next].is_blocked() {
                    continue;
                }
                dist[next] = Some(hops + 1);
                reached.push(next);
                frontier.push_back(next);
            }
        }

        Ok(Self {
            seed: seed_idx,
            dist,
            reached,
        })
    }

    pub fn seed(&self) -> usize {
        self.seed
    }

    /// Hop count at `index`, `None` when unreachable (or out of range).
    pub fn distance(&self, index: usize) -> Option<u32> {
        self.dist.get(index).copied().flatten()
    }

    pub fn distance_to(&self, grid: &Grid, coord: Coordinate) -> Result<Option<u32>, GridError> {
        Ok(self.distance(grid.index_of(coord)?))
    }

    /// Settled cell indices in discovery order, seed first.
    pub fn reached(&self) -> &[usize] {
        &self.reached
    }

    pub fn is_reachable(&self, index: usize) -> bool {
        self.distance(index).is_some()
    }
}

/// Chebyshev distance between two on-board coordinates.
pub fn blast_distance(grid: &Grid, from: Coordinate, to: Coordinate) -> Result<u32, GridError> {
    grid.index_of(from)?;
    grid.index_of(to)?;
    Ok(from.blast_distance(to))
}
