//! Torpedo target selection.

use rand::Rng;

use crate::engine::common::{Coordinate, GridError};
use crate::engine::config::BotTuning;
use crate::engine::distance::DistanceField;
use crate::engine::grid::Grid;
use crate::engine::state::SubmarineState;

/// Smallest torpedo range that can clear our own blast radius.
pub const MIN_TORPEDO_RANGE: u32 = 2;

/// Pick a torpedo target within range of `sub`, or decline.
///
/// Confirmed occupants win over contact estimates. Among occupants the
/// largest is preferred, but once a target is held a larger one replaces it
/// only with probability `tuning.larger_target_accept`. Without an occupant
/// the freshest cell one or two hops from a contact is used.
pub fn select_torpedo_target<R: Rng + ?Sized>(
    grid: &Grid,
    sub: &SubmarineState,
    tuning: &BotTuning,
    rng: &mut R,
) -> Result<Option<Coordinate>, GridError> {
    if sub.torpedo_range < MIN_TORPEDO_RANGE || sub.out_of_torpedoes() {
        return Ok(None);
    }

    let field = DistanceField::propagate(grid, sub.position, Some(sub.torpedo_range))?;

    let mut primary: Option<(u32, Coordinate)> = None;
    let mut secondary: Option<(u32, Coordinate)> = None;
    for &idx in field.reached() {
        let hops = field.distance(idx).unwrap_or(0);
        if hops <= 1 {
            continue;
        }
        let cell = grid.cell(idx)?;
        if sub.position.blast_distance(cell.coord()) <= 1 {
            continue;
        }

        if cell.occupant_size > 0 {
            primary = match primary {
                None => Some((cell.occupant_size, cell.coord())),
                Some((size, _)) if cell.occupant_size > size
                    && rng.random_bool(tuning.larger_target_accept) =>
                {
                    Some((cell.occupant_size, cell.coord()))
                }
                held => held,
            };
        }

        if (1..=2).contains(&cell.contact_dist) && cell.contact_age > 0 {
            secondary = match secondary {
                None => Some((cell.contact_age, cell.coord())),
                Some((age, _)) if cell.contact_age < age => {
                    Some((cell.contact_age, cell.coord()))
                }
                Some((age, _)) if cell.contact_age == age && rng.random_bool(tuning.tie_accept) => {
                    Some((cell.contact_age, cell.coord()))
                }
                held => held,
            };
        }
    }

    Ok(primary.or(secondary).map(|(_, coord)| coord))
}
