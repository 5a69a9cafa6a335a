//! Spatial reasoning and decision engine (no_std compatible)
//!
//! Everything here is synchronous computation over in-memory state and
//! depends only on `alloc`, `rand` and the `log` facade.

pub mod common;
pub mod config;
pub mod detection;
pub mod distance;
pub mod grid;
pub mod movement;
pub mod session;
pub mod state;
pub mod targeting;

// Re-export commonly used types
pub use common::{BotError, Coordinate, Direction, GridError};
pub use config::*;
pub use detection::DetectionTracker;
pub use distance::{blast_distance, DistanceField};
pub use grid::{Cell, Grid};
pub use movement::MovementPlanner;
pub use session::{ChargeTarget, Decision, Session};
pub use state::{Detonation, GameSummary, Impact, PlayerResult, SubmarineState, TurnEvidence};
pub use targeting::{select_torpedo_target, MIN_TORPEDO_RANGE};
