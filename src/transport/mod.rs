use alloc::boxed::Box;

use crate::protocol::{Command, Event};

/// Carries commands to the game server and parsed events back.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, cmd: Command) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Event>;
}

#[cfg(feature = "std")]
pub mod tcp;
#[cfg(feature = "std")]
pub mod in_memory;
