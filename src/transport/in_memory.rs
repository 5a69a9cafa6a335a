#![cfg(feature = "std")]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::task::yield_now;

use crate::protocol::{Command, Event};
use crate::transport::Transport;

/// Bot-side end of an in-process connection. Events pushed by the paired
/// [`ScriptedServer`] are received in order; sent commands queue up for it.
pub struct InMemoryTransport {
    events: Arc<Mutex<VecDeque<Event>>>,
    commands: Arc<Mutex<VecDeque<Command>>>,
}

/// Server-side end used to script a game in tests and local runs.
pub struct ScriptedServer {
    events: Arc<Mutex<VecDeque<Event>>>,
    commands: Arc<Mutex<VecDeque<Command>>>,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, ScriptedServer) {
        let events = Arc::new(Mutex::new(VecDeque::new()));
        let commands = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                events: events.clone(),
                commands: commands.clone(),
            },
            ScriptedServer { events, commands },
        )
    }
}

impl ScriptedServer {
    pub fn push(&self, event: Event) {
        lock(&self.events).push_back(event);
    }

    /// Parse and queue a raw server line.
    pub fn push_line(&self, line: &str) -> anyhow::Result<()> {
        self.push(Event::parse(line)?);
        Ok(())
    }

    /// Commands sent by the bot so far, oldest first.
    pub fn take_commands(&self) -> Vec<Command> {
        lock(&self.commands).drain(..).collect()
    }

    /// Wait for the next command from the bot.
    pub async fn next_command(&self) -> anyhow::Result<Command> {
        loop {
            let next = lock(&self.commands).pop_front();
            if let Some(cmd) = next {
                return Ok(cmd);
            }
            if Arc::strong_count(&self.commands) == 1 {
                return Err(anyhow::anyhow!("Channel closed"));
            }
            yield_now().await;
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, cmd: Command) -> anyhow::Result<()> {
        lock(&self.commands).push_back(cmd);
        Ok(())
    }

    async fn recv(&mut self) -> anyhow::Result<Event> {
        loop {
            let next = lock(&self.events).pop_front();
            if let Some(event) = next {
                return Ok(event);
            }
            if Arc::strong_count(&self.events) == 1 {
                return Err(anyhow::anyhow!("Channel closed"));
            }
            yield_now().await;
        }
    }
}
