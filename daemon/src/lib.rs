//! witness daemon — configuration, event loop and shutdown handling.
//!
//! The binary in `main.rs` is a thin CLI over this library so the event loop
//! can be driven by tests with nullable collaborators.

pub mod bot;
pub mod config;
pub mod error;
pub mod shutdown;

pub use bot::{Bot, BotStats};
pub use config::{DaemonConfig, TransportConfig, TransportKind};
pub use error::DaemonError;
pub use shutdown::{ShutdownController, ShutdownSignal};
