//! Turn controller: the strict per-turn state machine between the protocol
//! layer and the decision engine.
//!
//! ```text
//! AwaitConfig -> AwaitSettings -> AwaitJoin -> AwaitBeginTurn
//!     AwaitBeginTurn / AwaitTurnEvents  <->  (BeginTurn issues a command)
//!     GameFinished -> AwaitResults -> Finished
//! ```
//!
//! Every turn-scoped event must carry the current turn number, a begin-turn
//! event must carry the next one. Anything else is a fatal protocol
//! violation and leaves the state untouched.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use rand::Rng;

use crate::engine::{BotError, BotTuning, Coordinate, Decision, GameSummary, PlayerResult, Session};
use crate::protocol::{Command, CustomSetting, Event};

/// Controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitConfig,
    /// Custom settings still expected after the configuration.
    AwaitSettings { remaining: usize },
    /// Join command sent, waiting for the server to echo our name.
    AwaitJoin,
    /// Joined; no turn has started yet.
    AwaitBeginTurn,
    /// A command was issued for the current turn; collecting its results.
    AwaitTurnEvents,
    /// Player result records still expected after game-finished.
    AwaitResults { remaining: usize },
    Finished,
}

pub struct TurnController {
    name: String,
    tuning: BotTuning,
    phase: Phase,
    turn: u32,
    session: Option<Session>,
    summary: Option<GameSummary>,
}

impl TurnController {
    pub fn new(name: impl Into<String>, tuning: BotTuning) -> Self {
        Self {
            name: name.into(),
            tuning,
            phase: Phase::AwaitConfig,
            turn: 0,
            session: None,
            summary: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Final results once the game is over.
    pub fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    /// Fold one inbound event. Returns the command to send, if any.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        event: Event,
        rng: &mut R,
    ) -> Result<Option<Command>, BotError> {
        match (self.phase, event) {
            (Phase::AwaitConfig, Event::Config(config)) => {
                let session = Session::new(config.width, config.height, self.tuning.clone())?;
                log::info!("Server Version    : {}", config.server_version);
                log::info!("Game Title        : {}", config.title);
                log::info!("Game Map Size     : {} x {}", config.width, config.height);
                self.session = Some(session);
                self.turn = 0;
                if config.custom_setting_count == 0 {
                    self.join(rng).map(Some)
                } else {
                    self.phase = Phase::AwaitSettings {
                        remaining: config.custom_setting_count,
                    };
                    Ok(None)
                }
            }
            (Phase::AwaitSettings { remaining }, Event::CustomSetting(setting)) => {
                self.apply_setting(&setting)?;
                if remaining <= 1 {
                    self.join(rng).map(Some)
                } else {
                    self.phase = Phase::AwaitSettings {
                        remaining: remaining - 1,
                    };
                    Ok(None)
                }
            }
            (Phase::AwaitJoin, Event::JoinAccepted { name }) => {
                if name != self.name {
                    return Err(BotError::ProtocolViolation(format!(
                        "failed to join game: server answered for {:?}, expected {:?}",
                        name, self.name
                    )));
                }
                log::info!("Joined as Player  : {}", name);
                self.phase = Phase::AwaitBeginTurn;
                Ok(None)
            }
            (Phase::AwaitBeginTurn | Phase::AwaitTurnEvents, Event::BeginTurn { turn }) => {
                self.expect_turn(turn, self.turn + 1)?;
                self.begin_turn(turn, rng).map(Some)
            }
            (Phase::AwaitBeginTurn | Phase::AwaitTurnEvents, Event::GameFinished {
                player_count,
                turn_count,
                status,
            }) => {
                log::info!("game {}", status);
                self.summary = Some(GameSummary {
                    status,
                    turn_count,
                    players: Vec::with_capacity(player_count),
                });
                self.phase = Phase::AwaitResults {
                    remaining: player_count,
                };
                Ok(None)
            }
            (Phase::AwaitBeginTurn | Phase::AwaitTurnEvents, event) if event.turn().is_some() => {
                self.apply_turn_event(event)?;
                Ok(None)
            }
            (Phase::AwaitResults { remaining }, Event::PlayerResult(result)) => {
                self.record_result(result);
                self.phase = if remaining <= 1 {
                    Phase::Finished
                } else {
                    Phase::AwaitResults {
                        remaining: remaining - 1,
                    }
                };
                Ok(None)
            }
            (phase, event) => Err(BotError::ProtocolViolation(format!(
                "unexpected {} message in phase {:?}: {:?}",
                event.kind(),
                phase,
                event
            ))),
        }
    }

    fn session_mut(&mut self) -> Result<&mut Session, BotError> {
        self.session
            .as_mut()
            .ok_or_else(|| BotError::ProtocolViolation("game is not configured".into()))
    }

    fn expect_turn(&self, got: u32, expected: u32) -> Result<(), BotError> {
        if got != expected {
            return Err(BotError::ProtocolViolation(format!(
                "expected turn number {}, got {}",
                expected, got
            )));
        }
        Ok(())
    }

    fn apply_setting(&mut self, setting: &CustomSetting) -> Result<(), BotError> {
        match setting.name.as_str() {
            "SubsPerPlayer" => {
                let subs = setting.uint(0)?;
                if subs != 1 {
                    return Err(BotError::Configuration(format!(
                        "this bot only supports 1 sub per player, game has {}",
                        subs
                    )));
                }
            }
            "Obstacle" => {
                let x = setting.uint(0)? as i32;
                let y = setting.uint(1)? as i32;
                self.session_mut()?.add_obstacle(Coordinate::new(x, y))?;
            }
            _ => log::warn!("CustomSetting     : {} {:?}", setting.name, setting.values),
        }
        Ok(())
    }

    fn join<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Command, BotError> {
        let session = self.session_mut()?;
        let position = session.random_open_cell(rng)?;
        session.place_submarine(position)?;
        self.phase = Phase::AwaitJoin;
        Ok(Command::Join {
            name: self.name.clone(),
            position,
        })
    }

    fn begin_turn<R: Rng + ?Sized>(&mut self, turn: u32, rng: &mut R) -> Result<Command, BotError> {
        let session = self.session_mut()?;
        let decision = session.decide(rng)?;
        let sub_id = session.submarine().map(|s| s.sub_id).unwrap_or(0);
        session.end_turn();

        self.turn = turn;
        self.phase = Phase::AwaitTurnEvents;
        log::debug!("turn {}: {:?}", turn, decision);
        Ok(match decision {
            Decision::Fire(target) => Command::Fire {
                turn,
                sub_id,
                target,
            },
            Decision::Ping => Command::Ping { turn, sub_id },
            Decision::Move { direction, charge } => Command::Move {
                turn,
                sub_id,
                direction,
                charge,
            },
        })
    }

    fn apply_turn_event(&mut self, event: Event) -> Result<(), BotError> {
        if let Some(turn) = event.turn() {
            self.expect_turn(turn, self.turn)?;
        }
        let session = self.session_mut()?;
        match event {
            Event::SonarDiscovery { range, .. } => session.record_sonar_contact(range),
            Event::SprintActivations { count, .. } => session.record_sprints(count),
            Event::Detonation { detonation, .. } => session.record_detonation(detonation)?,
            Event::TorpedoHit { hit, .. } => {
                log::info!("    Torpedo Hit at {}, damage={}", hit.position, hit.damage);
                session.record_torpedo_hit(hit)?;
            }
            Event::MineHit { hit, .. } => {
                log::info!("    Mine Hit at {}, damage={}", hit.position, hit.damage);
                session.record_mine_hit(hit)?;
            }
            Event::DiscoveredObject { position, size, .. } => {
                session.record_discovery(position, size)?;
            }
            Event::SubmarineInfo { sub, .. } => session.update_submarine(sub)?,
            Event::PlayerScore { score, .. } => session.record_score(score),
            other => {
                return Err(BotError::ProtocolViolation(format!(
                    "unexpected {} message: {:?}",
                    other.kind(),
                    other
                )))
            }
        }
        Ok(())
    }

    fn record_result(&mut self, result: PlayerResult) {
        log::info!("  {} score = {}", result.name, result.score);
        if let Some(summary) = self.summary.as_mut() {
            summary.players.push(result);
        }
    }
}
