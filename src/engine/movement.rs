//! Roaming destination management and single-step direction choice.

use alloc::vec::Vec;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::engine::common::{BotError, Coordinate, Direction};
use crate::engine::config::BotTuning;
use crate::engine::distance::DistanceField;
use crate::engine::grid::{Cell, Grid};

#[derive(Debug, Default, Clone)]
pub struct MovementPlanner {
    destination: Option<Coordinate>,
    /// The destination was accepted with the edge and contact policy relaxed.
    relaxed: bool,
    last_direction: Option<Direction>,
}

impl MovementPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    pub fn is_relaxed(&self) -> bool {
        self.relaxed
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    /// Forget the destination so the next move plans a fresh one.
    pub fn clear_destination(&mut self) {
        self.destination = None;
        self.relaxed = false;
    }

    /// Within `margin` cells of any border.
    pub fn is_on_edge(grid: &Grid, coord: Coordinate, margin: u32) -> bool {
        let margin = margin as i64;
        let (x, y) = (coord.x as i64, coord.y as i64);
        let (w, h) = (grid.width() as i64, grid.height() as i64);
        x - 1 < margin || y - 1 < margin || w - x < margin || h - y < margin
    }

    /// Policy filter for destinations; hard constraints are checked elsewhere.
    fn is_preferred(grid: &Grid, cell: &Cell, tuning: &BotTuning) -> bool {
        let recent_contact = cell.contact_age > 0 && cell.contact_age < tuning.avoid_contact_age;
        !Self::is_on_edge(grid, cell.coord(), tuning.edge_margin) && !recent_contact
    }

    /// `true` when some cell reachable from `from` satisfies the policy.
    fn preferred_reachable(
        grid: &Grid,
        from: Coordinate,
        tuning: &BotTuning,
    ) -> Result<bool, BotError> {
        let field = DistanceField::propagate(grid, from, None)?;
        for &idx in field.reached().iter().skip(1) {
            if Self::is_preferred(grid, grid.cell(idx)?, tuning) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Keep the current destination when still usable, otherwise choose a
    /// new one and recompute every cell's `path_dist` toward it.
    ///
    /// A destination picked with the policy relaxed is kept until reached,
    /// or until a reachable cell satisfies the policy again.
    pub fn ensure_destination<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        from: Coordinate,
        tuning: &BotTuning,
        rng: &mut R,
    ) -> Result<Coordinate, BotError> {
        let from_idx = grid.index_of(from)?;
        if let Some(dest) = self.destination {
            let cell = grid.cell_at(dest)?;
            if dest != from && !cell.is_blocked() {
                if Self::is_preferred(grid, cell, tuning) {
                    return Ok(dest);
                }
                if self.relaxed && !Self::preferred_reachable(grid, from, tuning)? {
                    return Ok(dest);
                }
            }
        }

        for _ in 0..tuning.destination_tries {
            let candidate = Coordinate::new(
                rng.random_range(1..=grid.width() as i32),
                rng.random_range(1..=grid.height() as i32),
            );
            let cell = grid.cell_at(candidate)?;
            if candidate == from || cell.is_blocked() || !Self::is_preferred(grid, cell, tuning) {
                continue;
            }
            if self.plan_toward(grid, candidate, from_idx)? {
                self.relaxed = false;
                return Ok(candidate);
            }
        }

        // relax the policy but never the hard constraints
        let mut fallback: Vec<Coordinate> = grid
            .open_cells()
            .map(|c| c.coord())
            .filter(|&c| c != from)
            .collect();
        fallback.shuffle(rng);
        for candidate in fallback {
            if self.plan_toward(grid, candidate, from_idx)? {
                self.relaxed = true;
                log::debug!("destination {} accepted with relaxed policy", candidate);
                return Ok(candidate);
            }
        }

        self.destination = None;
        self.relaxed = false;
        grid.reset_path_distances();
        Err(BotError::NoLegalMove {
            x: from.x,
            y: from.y,
        })
    }

    /// Force a specific destination, bypassing the policy like a relaxed
    /// pick. Returns `false`, leaving the planner unchanged, when `dest` is
    /// blocked or unreachable from `from`.
    pub fn set_destination(
        &mut self,
        grid: &mut Grid,
        from: Coordinate,
        dest: Coordinate,
    ) -> Result<bool, BotError> {
        let from_idx = grid.index_of(from)?;
        if grid.is_blocked(dest)? {
            return Ok(false);
        }
        let planned = self.plan_toward(grid, dest, from_idx)?;
        if planned {
            self.relaxed = true;
        }
        Ok(planned)
    }

    /// Adopt `dest` if the submarine can reach it.
    fn plan_toward(
        &mut self,
        grid: &mut Grid,
        dest: Coordinate,
        from_idx: usize,
    ) -> Result<bool, BotError> {
        let field = DistanceField::propagate(grid, dest, None)?;
        if !field.is_reachable(from_idx) {
            return Ok(false);
        }
        grid.reset_path_distances();
        grid.store_path_distances(&field);
        self.destination = Some(dest);
        log::debug!("new destination {}", dest);
        Ok(true)
    }

    /// Step toward the destination: the neighbour minimising `path_dist`
    /// plus one when that cell carries any contact history.
    pub fn pick_direction<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        from: Coordinate,
        shuffle: bool,
        rng: &mut R,
    ) -> Result<Direction, BotError> {
        grid.index_of(from)?;
        let mut dirs = Direction::ALL;
        if shuffle {
            dirs.shuffle(rng);
        }

        let mut best: Option<(u32, Direction)> = None;
        for dir in dirs {
            let to = from.shifted(dir);
            if !grid.contains(to) {
                continue;
            }
            let cell = grid.cell_at(to)?;
            if cell.is_blocked() {
                continue;
            }
            let Some(dist) = cell.path_dist else {
                continue;
            };
            let cost = dist + u32::from(cell.contact_age > 0);
            if best.map_or(true, |(c, _)| cost < c) {
                best = Some((cost, dir));
            }
        }

        match best {
            Some((_, dir)) => {
                self.last_direction = Some(dir);
                Ok(dir)
            }
            None => Err(BotError::NoLegalMove {
                x: from.x,
                y: from.y,
            }),
        }
    }
}
