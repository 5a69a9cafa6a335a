#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
pub mod bot_node;
pub mod controller;
pub mod engine;
#[cfg(feature = "std")]
mod logging;
pub mod protocol;
#[cfg(feature = "std")]
pub mod transport;

#[cfg(feature = "std")]
pub use bot_node::BotNode;
pub use controller::{Phase, TurnController};
pub use engine::*;
#[cfg(feature = "std")]
pub use logging::init_logging;
pub use protocol::{Command, Event};
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
