use alloc::format;
use alloc::string::String;
use core::fmt;

use super::{expect_len, malformed, number, split_fields, text};
use crate::engine::{BotError, ChargeTarget, Coordinate, Direction};

/// An outbound message. Every in-game command carries the turn number and
/// the submarine id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `J|name|x|y`
    Join { name: String, position: Coordinate },
    /// `F|turn|subId|x|y`
    Fire {
        turn: u32,
        sub_id: u32,
        target: Coordinate,
    },
    /// `P|turn|subId`
    Ping { turn: u32, sub_id: u32 },
    /// `M|turn|subId|direction|charge`
    Move {
        turn: u32,
        sub_id: u32,
        direction: Direction,
        charge: ChargeTarget,
    },
}

impl Command {
    pub fn turn(&self) -> Option<u32> {
        match self {
            Command::Join { .. } => None,
            Command::Fire { turn, .. } | Command::Ping { turn, .. } | Command::Move { turn, .. } => {
                Some(*turn)
            }
        }
    }

    /// Parse a command line, as a server would.
    pub fn parse(line: &str) -> Result<Command, BotError> {
        let fields = split_fields(line)?;
        match fields[0] {
            "J" => {
                expect_len(&fields, 4, false, "join")?;
                Ok(Command::Join {
                    name: text(&fields, 1, "player name")?,
                    position: Coordinate::new(
                        number(&fields, 2, "X coordinate", 1)?,
                        number(&fields, 3, "Y coordinate", 1)?,
                    ),
                })
            }
            "F" => {
                expect_len(&fields, 5, false, "fire")?;
                Ok(Command::Fire {
                    turn: number(&fields, 1, "turn number", 1)?,
                    sub_id: number(&fields, 2, "sub ID", 0)?,
                    target: Coordinate::new(
                        number(&fields, 3, "X coordinate", 1)?,
                        number(&fields, 4, "Y coordinate", 1)?,
                    ),
                })
            }
            "P" => {
                expect_len(&fields, 3, false, "ping")?;
                Ok(Command::Ping {
                    turn: number(&fields, 1, "turn number", 1)?,
                    sub_id: number(&fields, 2, "sub ID", 0)?,
                })
            }
            "M" => {
                expect_len(&fields, 5, false, "move")?;
                Ok(Command::Move {
                    turn: number(&fields, 1, "turn number", 1)?,
                    sub_id: number(&fields, 2, "sub ID", 0)?,
                    direction: Direction::from_code(fields[3])
                        .ok_or_else(|| malformed("direction", &fields))?,
                    charge: ChargeTarget::from_name(fields[4])
                        .ok_or_else(|| malformed("charge target", &fields))?,
                })
            }
            kind => Err(BotError::ProtocolViolation(format!(
                "unknown command type {:?}: {:?}",
                kind, fields
            ))),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Join { name, position } => {
                write!(f, "J|{}|{}|{}", name, position.x, position.y)
            }
            Command::Fire {
                turn,
                sub_id,
                target,
            } => write!(f, "F|{}|{}|{}|{}", turn, sub_id, target.x, target.y),
            Command::Ping { turn, sub_id } => write!(f, "P|{}|{}", turn, sub_id),
            Command::Move {
                turn,
                sub_id,
                direction,
                charge,
            } => write!(
                f,
                "M|{}|{}|{}|{}",
                turn,
                sub_id,
                direction.code(),
                charge.name()
            ),
        }
    }
}
