//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the workflow (archival gateway, payload
//! storage, chat transport) is abstracted behind a trait. This crate provides
//! test-friendly implementations that:
//! - Return scripted, deterministic values
//! - Record what they were asked to do, for assertions
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod gateway;
pub mod loader;
pub mod transport;

pub use gateway::NullGateway;
pub use loader::NullLoader;
pub use transport::NullTransport;
