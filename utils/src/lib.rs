//! Shared utilities for the witness bot.

pub mod logging;

pub use logging::{init_logging, LogFormat};
