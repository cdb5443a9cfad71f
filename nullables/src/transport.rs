//! Nullable transport — feed events from a queue, record messages instead of sending them.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use witness_transport::{Transport, TransportError};
use witness_types::{InboundEvent, OutboundMessage};

#[derive(Default)]
struct Inner {
    inbox: VecDeque<InboundEvent>,
    sent: Vec<OutboundMessage>,
    fail_sends: bool,
}

/// A test transport. Clones share state, so a test can keep one handle while
/// the bot loop owns another.
///
/// The event stream ends once the inbox is drained.
#[derive(Clone, Default)]
pub struct NullTransport {
    inner: Arc<Mutex<Inner>>,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an event for the bot to receive.
    pub fn enqueue(&self, event: InboundEvent) {
        self.inner.lock().unwrap().inbox.push_back(event);
    }

    /// All messages "sent" so far.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.inner.lock().unwrap().sent.clone()
    }

    /// Make every subsequent send fail.
    pub fn fail_sends(&self, fail: bool) {
        self.inner.lock().unwrap().fail_sends = fail;
    }

    /// Clear all state.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.inbox.clear();
        inner.sent.clear();
        inner.fail_sends = false;
    }
}

#[async_trait]
impl Transport for NullTransport {
    async fn next_event(&mut self) -> Result<Option<InboundEvent>, TransportError> {
        Ok(self.inner.lock().unwrap().inbox.pop_front())
    }

    async fn send(&mut self, message: &OutboundMessage) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_sends {
            return Err(TransportError::Closed);
        }
        inner.sent.push(message.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
