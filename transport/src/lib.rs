//! Chat transports.
//!
//! A [`Transport`] delivers inbound events to the bot and sends its replies.
//! Two implementations are provided:
//! - [`SignaldTransport`] — Signal messenger via the signald daemon's JSON socket.
//! - [`ConsoleTransport`] — stdin/stdout lines, for local development.

pub mod console;
pub mod error;
pub mod signald;

pub use console::ConsoleTransport;
pub use error::TransportError;
pub use signald::SignaldTransport;

use async_trait::async_trait;
use witness_types::{InboundEvent, OutboundMessage};

/// Source of inbound events and sink for outbound messages.
#[async_trait]
pub trait Transport: Send {
    /// Wait for the next inbound event. `Ok(None)` means the stream has ended.
    async fn next_event(&mut self) -> Result<Option<InboundEvent>, TransportError>;

    /// Deliver one message.
    async fn send(&mut self, message: &OutboundMessage) -> Result<(), TransportError>;

    /// Human-readable name of this transport.
    fn name(&self) -> &str;
}
