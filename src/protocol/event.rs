use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::{expect_len, malformed, number, split_fields, text};
use crate::engine::{BotError, Coordinate, Detonation, Impact, PlayerResult, SubmarineState};

/// `C|serverVersion|title|width|height|customSettingCount`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub server_version: String,
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub custom_setting_count: usize,
}

/// `V|name|value...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSetting {
    pub name: String,
    pub values: Vec<String>,
}

impl CustomSetting {
    /// Value `idx` as an unsigned integer.
    pub fn uint(&self, idx: usize) -> Result<u32, BotError> {
        self.values
            .get(idx)
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or_else(|| {
                BotError::ProtocolViolation(format!(
                    "invalid {} value #{}: {:?}",
                    self.name, idx, self.values
                ))
            })
    }
}

/// A parsed inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Config(GameConfig),
    CustomSetting(CustomSetting),
    /// `J|name`
    JoinAccepted { name: String },
    /// `B|turn`
    BeginTurn { turn: u32 },
    /// `S|turn|range`
    SonarDiscovery { turn: u32, range: u32 },
    /// `R|turn|count`
    SprintActivations { turn: u32, count: u32 },
    /// `D|turn|x|y|radius`
    Detonation { turn: u32, detonation: Detonation },
    /// `T|turn|x|y|damage`
    TorpedoHit { turn: u32, hit: Impact },
    /// `M|turn|x|y|damage`
    MineHit { turn: u32, hit: Impact },
    /// `O|turn|x|y|size`
    DiscoveredObject {
        turn: u32,
        position: Coordinate,
        size: u32,
    },
    /// `I|turn|subId|x|y|active|key=value...`
    SubmarineInfo { turn: u32, sub: SubmarineState },
    /// `H|turn|score`
    PlayerScore { turn: u32, score: u32 },
    /// `F|playerCount|turnCount|status`
    GameFinished {
        player_count: usize,
        turn_count: u32,
        status: String,
    },
    /// `F|name|score`, one per player after `GameFinished`.
    PlayerResult(PlayerResult),
}

impl Event {
    pub fn parse(line: &str) -> Result<Event, BotError> {
        let fields = split_fields(line)?;
        match fields[0] {
            "C" => {
                expect_len(&fields, 6, false, "game configuration")?;
                Ok(Event::Config(GameConfig {
                    server_version: text(&fields, 1, "server version")?,
                    title: text(&fields, 2, "game title")?,
                    width: number(&fields, 3, "map width", 1)?,
                    height: number(&fields, 4, "map height", 1)?,
                    custom_setting_count: number(&fields, 5, "custom setting count", 0)?,
                }))
            }
            "V" => {
                expect_len(&fields, 3, true, "custom setting")?;
                Ok(Event::CustomSetting(CustomSetting {
                    name: text(&fields, 1, "setting name")?,
                    values: fields[2..].iter().map(|v| String::from(*v)).collect(),
                }))
            }
            "J" => {
                expect_len(&fields, 2, false, "join response")?;
                Ok(Event::JoinAccepted {
                    name: text(&fields, 1, "player name")?,
                })
            }
            "B" => {
                expect_len(&fields, 2, false, "begin turn")?;
                Ok(Event::BeginTurn {
                    turn: number(&fields, 1, "turn number", 1)?,
                })
            }
            "S" => {
                expect_len(&fields, 3, false, "sonar discovery")?;
                Ok(Event::SonarDiscovery {
                    turn: number(&fields, 1, "turn number", 0)?,
                    range: number(&fields, 2, "range", 0)?,
                })
            }
            "R" => {
                expect_len(&fields, 3, false, "sprint activations")?;
                Ok(Event::SprintActivations {
                    turn: number(&fields, 1, "turn number", 0)?,
                    count: number(&fields, 2, "count", 1)?,
                })
            }
            "D" => {
                expect_len(&fields, 5, false, "detonation")?;
                Ok(Event::Detonation {
                    turn: number(&fields, 1, "turn number", 0)?,
                    detonation: Detonation {
                        position: position(&fields, 2)?,
                        radius: number(&fields, 4, "radius", 1)?,
                    },
                })
            }
            "T" => {
                expect_len(&fields, 5, false, "torpedo hit")?;
                Ok(Event::TorpedoHit {
                    turn: number(&fields, 1, "turn number", 0)?,
                    hit: impact(&fields)?,
                })
            }
            "M" => {
                expect_len(&fields, 5, false, "mine hit")?;
                Ok(Event::MineHit {
                    turn: number(&fields, 1, "turn number", 0)?,
                    hit: impact(&fields)?,
                })
            }
            "O" => {
                expect_len(&fields, 5, false, "discovered object")?;
                Ok(Event::DiscoveredObject {
                    turn: number(&fields, 1, "turn number", 0)?,
                    position: position(&fields, 2)?,
                    size: number(&fields, 4, "size", 1)?,
                })
            }
            "I" => parse_submarine_info(&fields),
            "H" => {
                expect_len(&fields, 3, false, "player score")?;
                Ok(Event::PlayerScore {
                    turn: number(&fields, 1, "turn number", 0)?,
                    score: number(&fields, 2, "score", 0)?,
                })
            }
            "F" if fields.len() == 4 => Ok(Event::GameFinished {
                player_count: number(&fields, 1, "player count", 1)?,
                turn_count: number(&fields, 2, "turn count", 0)?,
                status: String::from(fields[3]),
            }),
            "F" if fields.len() == 3 => Ok(Event::PlayerResult(PlayerResult {
                name: text(&fields, 1, "player name")?,
                score: number(&fields, 2, "score", 0)?,
            })),
            "F" => Err(BotError::ProtocolViolation(format!(
                "invalid game finished message: {:?}",
                fields
            ))),
            kind => Err(BotError::ProtocolViolation(format!(
                "unknown message type {:?}: {:?}",
                kind, fields
            ))),
        }
    }

    /// Turn number carried by turn-scoped events.
    pub fn turn(&self) -> Option<u32> {
        match self {
            Event::BeginTurn { turn }
            | Event::SonarDiscovery { turn, .. }
            | Event::SprintActivations { turn, .. }
            | Event::Detonation { turn, .. }
            | Event::TorpedoHit { turn, .. }
            | Event::MineHit { turn, .. }
            | Event::DiscoveredObject { turn, .. }
            | Event::SubmarineInfo { turn, .. }
            | Event::PlayerScore { turn, .. } => Some(*turn),
            _ => None,
        }
    }

    /// Short name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Config(_) => "Config",
            Event::CustomSetting(_) => "CustomSetting",
            Event::JoinAccepted { .. } => "JoinAccepted",
            Event::BeginTurn { .. } => "BeginTurn",
            Event::SonarDiscovery { .. } => "SonarDiscovery",
            Event::SprintActivations { .. } => "SprintActivations",
            Event::Detonation { .. } => "Detonation",
            Event::TorpedoHit { .. } => "TorpedoHit",
            Event::MineHit { .. } => "MineHit",
            Event::DiscoveredObject { .. } => "DiscoveredObject",
            Event::SubmarineInfo { .. } => "SubmarineInfo",
            Event::PlayerScore { .. } => "PlayerScore",
            Event::GameFinished { .. } => "GameFinished",
            Event::PlayerResult(_) => "PlayerResult",
        }
    }
}

fn position(fields: &[&str], idx: usize) -> Result<Coordinate, BotError> {
    Ok(Coordinate::new(
        number(fields, idx, "X coordinate", 1)?,
        number(fields, idx + 1, "Y coordinate", 1)?,
    ))
}

fn impact(fields: &[&str]) -> Result<Impact, BotError> {
    Ok(Impact {
        position: position(fields, 2)?,
        damage: number(fields, 4, "damage", 1)?,
    })
}

fn flag(fields: &[&str], idx: usize, what: &str) -> Result<bool, BotError> {
    match fields.get(idx).copied() {
        Some("0") => Ok(false),
        Some("1") => Ok(true),
        _ => Err(malformed(what, fields)),
    }
}

fn parse_submarine_info(fields: &[&str]) -> Result<Event, BotError> {
    expect_len(fields, 6, true, "submarine info")?;
    let turn = number(fields, 1, "turn number", 0)?;
    let mut sub = SubmarineState {
        sub_id: number(fields, 2, "sub ID", 0)?,
        position: position(fields, 3)?,
        active: flag(fields, 5, "active flag")?,
        ..SubmarineState::default()
    };

    for field in &fields[6..] {
        let (key, raw) = field
            .split_once('=')
            .ok_or_else(|| malformed("submarine field", fields))?;
        let value: u32 = raw
            .trim()
            .parse()
            .map_err(|_| malformed("submarine field", fields))?;
        let as_flag = || match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(malformed("submarine flag", fields)),
        };
        match key.trim() {
            "shields" => sub.shields = value,
            "size" => sub.size = value,
            "torpedos" => sub.torpedoes = Some(value),
            "mines" => sub.mines = Some(value),
            "sonar_range" => sub.sonar_range = value,
            "sprint_range" => sub.sprint_range = value,
            "torpedo_range" => sub.torpedo_range = value,
            "surface_remain" => sub.surface_turns_remaining = value,
            "reactor_damage" => sub.reactor_damage = value,
            "dead" => sub.dead = as_flag()?,
            "mine_ready" => sub.mine_ready = as_flag()?,
            "max_sonar" => sub.max_sonar_charge = as_flag()?,
            "max_sprint" => sub.max_sprint_charge = as_flag()?,
            "max_torpedo" => sub.max_torpedo_charge = as_flag()?,
            other => {
                return Err(BotError::ProtocolViolation(format!(
                    "unknown submarine field {:?}: {:?}",
                    other, fields
                )))
            }
        }
    }

    Ok(Event::SubmarineInfo { turn, sub })
}
