use alloc::format;

use crate::engine::common::BotError;

/// Sentinel minimum sonar range used before any discovery was heard.
pub const INITIAL_SONAR_MIN_RANGE: u32 = 100;

/// Largest map, in cells, the bot agrees to allocate.
pub const MAX_MAP_CELLS: usize = 1 << 20;

/// Random destination draws before policy constraints are relaxed.
pub const DESTINATION_TRIES: usize = 100;

/// Tuning knobs for the decision heuristics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BotTuning {
    /// Chance of switching to a strictly larger occupant once a target is held.
    pub larger_target_accept: f64,
    /// Chance of switching between equally fresh contact cells.
    pub tie_accept: f64,
    /// Cells closer than this to any border are not used as destinations.
    pub edge_margin: u32,
    /// Destinations whose contact age is in `1..avoid_contact_age` are avoided.
    pub avoid_contact_age: u32,
    /// Fixed part of the sonar ping threshold.
    pub sonar_threshold_base: u32,
    /// The random part of the threshold spans `cells / divisor` values.
    pub sonar_threshold_divisor: u32,
    pub destination_tries: usize,
    /// Randomise neighbour order before choosing a move.
    pub shuffle_directions: bool,
}

impl Default for BotTuning {
    fn default() -> Self {
        Self {
            larger_target_accept: 0.8,
            tie_accept: 0.5,
            edge_margin: 2,
            avoid_contact_age: 7,
            sonar_threshold_base: 10,
            sonar_threshold_divisor: 40,
            destination_tries: DESTINATION_TRIES,
            shuffle_directions: true,
        }
    }
}

impl BotTuning {
    pub fn validate(&self) -> Result<(), BotError> {
        for (name, p) in [
            ("larger_target_accept", self.larger_target_accept),
            ("tie_accept", self.tie_accept),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(BotError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        if self.sonar_threshold_divisor == 0 {
            return Err(BotError::Configuration(
                "sonar_threshold_divisor must be positive".into(),
            ));
        }
        Ok(())
    }
}
