//! Per-game context bundling everything the decision heuristics read and
//! mutate. One `Session` lives for the whole game and is owned by the turn
//! controller.

use alloc::format;
use rand::Rng;

use crate::engine::common::{BotError, Coordinate, Direction};
use crate::engine::config::{BotTuning, INITIAL_SONAR_MIN_RANGE, MAX_MAP_CELLS};
use crate::engine::detection::DetectionTracker;
use crate::engine::grid::Grid;
use crate::engine::movement::MovementPlanner;
use crate::engine::state::{Detonation, Impact, SubmarineState, TurnEvidence};
use crate::engine::targeting::select_torpedo_target;

/// Equipment charged while moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ChargeTarget {
    Sonar,
    Torpedo,
}

impl ChargeTarget {
    pub fn name(self) -> &'static str {
        match self {
            ChargeTarget::Sonar => "Sonar",
            ChargeTarget::Torpedo => "Torpedo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Sonar" => Some(ChargeTarget::Sonar),
            "Torpedo" => Some(ChargeTarget::Torpedo),
            _ => None,
        }
    }
}

/// What the submarine does this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Fire(Coordinate),
    Ping,
    Move {
        direction: Direction,
        charge: ChargeTarget,
    },
}

pub struct Session {
    grid: Grid,
    tuning: BotTuning,
    sub: Option<SubmarineState>,
    evidence: TurnEvidence,
    tracker: DetectionTracker,
    planner: MovementPlanner,
    sonar_min_range: u32,
    last_score: Option<u32>,
}

impl Session {
    pub fn new(width: usize, height: usize, tuning: BotTuning) -> Result<Self, BotError> {
        if width == 0 || height == 0 {
            return Err(BotError::Configuration(format!(
                "map size must be positive, got {}x{}",
                width, height
            )));
        }
        match width.checked_mul(height) {
            Some(cells) if cells <= MAX_MAP_CELLS => {}
            _ => {
                return Err(BotError::Configuration(format!(
                    "map size {}x{} exceeds {} squares",
                    width, height, MAX_MAP_CELLS
                )))
            }
        }
        tuning.validate()?;
        Ok(Self {
            grid: Grid::new(width, height),
            tuning,
            sub: None,
            evidence: TurnEvidence::default(),
            tracker: DetectionTracker::new(),
            planner: MovementPlanner::new(),
            sonar_min_range: INITIAL_SONAR_MIN_RANGE,
            last_score: None,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn tuning(&self) -> &BotTuning {
        &self.tuning
    }

    pub fn submarine(&self) -> Option<&SubmarineState> {
        self.sub.as_ref()
    }

    pub fn evidence(&self) -> &TurnEvidence {
        &self.evidence
    }

    pub fn planner(&self) -> &MovementPlanner {
        &self.planner
    }

    pub fn sonar_min_range(&self) -> u32 {
        self.sonar_min_range
    }

    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    pub fn add_obstacle(&mut self, coord: Coordinate) -> Result<(), BotError> {
        self.grid.block(coord)?;
        Ok(())
    }

    /// A random open cell, used as the requested start position.
    pub fn random_open_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Coordinate, BotError> {
        let open = self.grid.open_cells().count();
        if open == 0 {
            return Err(BotError::Configuration("every square is an obstacle".into()));
        }
        let pick = rng.random_range(0..open);
        self.grid
            .open_cells()
            .nth(pick)
            .map(|c| c.coord())
            .ok_or_else(|| BotError::Configuration("every square is an obstacle".into()))
    }

    /// Seed the submarine state with the requested start position until the
    /// server reports the real one.
    pub fn place_submarine(&mut self, position: Coordinate) -> Result<(), BotError> {
        self.grid.index_of(position)?;
        self.sub = Some(SubmarineState {
            position,
            active: true,
            ..SubmarineState::default()
        });
        Ok(())
    }

    pub fn update_submarine(&mut self, sub: SubmarineState) -> Result<(), BotError> {
        self.grid.index_of(sub.position)?;
        self.sub = Some(sub);
        Ok(())
    }

    pub fn record_sonar_contact(&mut self, range: u32) {
        self.evidence.sonar_contacts.push(range);
        self.sonar_min_range = self.sonar_min_range.min(range);
    }

    pub fn record_sprints(&mut self, count: u32) {
        self.evidence.sprints.push(count);
    }

    pub fn record_detonation(&mut self, detonation: Detonation) -> Result<(), BotError> {
        self.grid.index_of(detonation.position)?;
        self.evidence.detonations.push(detonation);
        Ok(())
    }

    pub fn record_torpedo_hit(&mut self, hit: Impact) -> Result<(), BotError> {
        self.grid.index_of(hit.position)?;
        self.evidence.torpedo_hits.push(hit);
        Ok(())
    }

    pub fn record_mine_hit(&mut self, hit: Impact) -> Result<(), BotError> {
        self.grid.index_of(hit.position)?;
        self.evidence.mine_hits.push(hit);
        Ok(())
    }

    pub fn record_score(&mut self, score: u32) {
        self.last_score = Some(score);
    }

    /// Fold a discovered object into the grid and the contact tracker.
    pub fn record_discovery(&mut self, coord: Coordinate, size: u32) -> Result<bool, BotError> {
        Ok(self.tracker.register_sighting(&mut self.grid, coord, size)?)
    }

    /// Choose this turn's action: fire when a target is in range, ping
    /// when the sonar heuristic says so, otherwise move and charge.
    pub fn decide<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Decision, BotError> {
        let sub = self
            .sub
            .clone()
            .ok_or_else(|| BotError::ProtocolViolation("no submarine info received".into()))?;

        if let Some(target) = select_torpedo_target(&self.grid, &sub, &self.tuning, rng)? {
            self.planner.clear_destination();
            return Ok(Decision::Fire(target));
        }

        if self.should_ping(&sub, rng)? {
            self.planner.clear_destination();
            return Ok(Decision::Ping);
        }

        let charge = if sub.max_torpedo_charge
            || sub.out_of_torpedoes()
            || sub.torpedo_range > sub.sonar_range
        {
            ChargeTarget::Sonar
        } else {
            ChargeTarget::Torpedo
        };

        self.planner
            .ensure_destination(&mut self.grid, sub.position, &self.tuning, rng)?;
        let direction = self.planner.pick_direction(
            &self.grid,
            sub.position,
            self.tuning.shuffle_directions,
            rng,
        )?;
        Ok(Decision::Move { direction, charge })
    }

    /// Sonar threshold for this turn. Recent close discoveries and fresh
    /// contact history at our own position both lower it.
    pub fn sonar_threshold<R: Rng + ?Sized>(&self, position: Coordinate, rng: &mut R) -> Result<u32, BotError> {
        let spread = (self.grid.len() as u32 / self.tuning.sonar_threshold_divisor).max(1);
        let mut threshold = self.tuning.sonar_threshold_base + rng.random_range(0..spread);
        let age = self.grid.cell_at(position)?.contact_age;
        if self.sonar_min_range < threshold {
            threshold = self.sonar_min_range;
        } else if age > 0 && age < threshold {
            threshold = age;
        }
        Ok(threshold)
    }

    fn should_ping<R: Rng + ?Sized>(&self, sub: &SubmarineState, rng: &mut R) -> Result<bool, BotError> {
        if sub.max_sonar_charge {
            return Ok(true);
        }
        let threshold = self.sonar_threshold(sub.position, rng)?;
        Ok(self.evidence.sonar_contacts.is_empty()
            && sub.sonar_range > 0
            && sub.torpedo_range >= sub.sonar_range
            && sub.sonar_range >= threshold)
    }

    /// Per-turn reset after the command went out: drop this turn's
    /// occupant sizes, age the contact fields and clear the evidence.
    pub fn end_turn(&mut self) {
        self.grid.clear_occupants();
        self.tracker.advance_turn(&mut self.grid);
        self.evidence.clear();
        self.sonar_min_range = self.sonar_min_range.saturating_add(1);
    }
}
