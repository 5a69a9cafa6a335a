//! Submarine status, per-turn evidence and end-of-game results.

use alloc::string::String;
use alloc::vec::Vec;

use crate::engine::common::Coordinate;

/// Last reported status of our submarine. Replaced wholesale on every
/// submarine-info event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SubmarineState {
    pub sub_id: u32,
    pub position: Coordinate,
    pub active: bool,
    pub dead: bool,
    pub mine_ready: bool,
    pub max_sonar_charge: bool,
    pub max_sprint_charge: bool,
    pub max_torpedo_charge: bool,
    pub shields: u32,
    pub size: u32,
    /// `None` when the server does not limit torpedoes.
    pub torpedoes: Option<u32>,
    /// `None` when the server does not limit mines.
    pub mines: Option<u32>,
    pub sonar_range: u32,
    pub sprint_range: u32,
    pub torpedo_range: u32,
    pub surface_turns_remaining: u32,
    pub reactor_damage: u32,
}

impl Default for SubmarineState {
    fn default() -> Self {
        Self {
            sub_id: 0,
            position: Coordinate::default(),
            active: false,
            dead: false,
            mine_ready: false,
            max_sonar_charge: false,
            max_sprint_charge: false,
            max_torpedo_charge: false,
            shields: 0,
            size: 100,
            torpedoes: None,
            mines: None,
            sonar_range: 0,
            sprint_range: 0,
            torpedo_range: 0,
            surface_turns_remaining: 0,
            reactor_damage: 0,
        }
    }
}

impl SubmarineState {
    pub fn out_of_torpedoes(&self) -> bool {
        self.torpedoes == Some(0)
    }
}

/// Something that hit at a position for some damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Impact {
    pub position: Coordinate,
    pub damage: u32,
}

/// A detonation centred on `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detonation {
    pub position: Coordinate,
    pub radius: u32,
}

/// Evidence gathered from one turn's results. Cleared at every turn start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnEvidence {
    /// Ranges of this turn's sonar contacts.
    pub sonar_contacts: Vec<u32>,
    /// Sprint activation counts.
    pub sprints: Vec<u32>,
    pub detonations: Vec<Detonation>,
    pub torpedo_hits: Vec<Impact>,
    pub mine_hits: Vec<Impact>,
}

impl TurnEvidence {
    pub fn clear(&mut self) {
        self.sonar_contacts.clear();
        self.sprints.clear();
        self.detonations.clear();
        self.torpedo_hits.clear();
        self.mine_hits.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.sonar_contacts.is_empty()
            && self.sprints.is_empty()
            && self.detonations.is_empty()
            && self.torpedo_hits.is_empty()
            && self.mine_hits.is_empty()
    }
}

/// Final score of one player.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerResult {
    pub name: String,
    pub score: u32,
}

/// Outcome of a finished game as announced by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSummary {
    pub status: String,
    pub turn_count: u32,
    pub players: Vec<PlayerResult>,
}
