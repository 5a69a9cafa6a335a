#![cfg(feature = "std")]

use alloc::boxed::Box;
use rand::rngs::SmallRng;

use crate::{
    controller::{Phase, TurnController},
    engine::GameSummary,
    transport::Transport,
};

/// Runs one game: pulls events off the transport, feeds them to the turn
/// controller and sends back whatever command it issues.
pub struct BotNode {
    controller: TurnController,
    transport: Box<dyn Transport>,
}

impl BotNode {
    pub fn new(controller: TurnController, transport: Box<dyn Transport>) -> Self {
        Self {
            controller,
            transport,
        }
    }

    /// Play until the server reports the game finished and every player
    /// result has been read. Any error is fatal to the session.
    pub async fn run(&mut self, rng: &mut SmallRng) -> anyhow::Result<GameSummary> {
        log::info!("Joining as Player : {}", self.controller.name());
        while !self.controller.is_finished() {
            let event = self.transport.recv().await?;
            let kind = event.kind();
            let command = self.controller.handle(event, rng).map_err(|e| {
                log::error!(
                    "[BotNode] {} rejected in phase {:?} (turn {}): {}",
                    kind,
                    self.controller.phase(),
                    self.controller.turn(),
                    e
                );
                anyhow::Error::new(e)
            })?;
            if let Some(command) = command {
                self.transport.send(command).await?;
            }
        }

        self.controller
            .summary()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("game finished without a summary"))
    }

    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }
}
