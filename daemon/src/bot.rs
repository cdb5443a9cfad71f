//! The bot event loop: transport in, workflow engine, transport out.

use tokio::sync::broadcast;
use witness_transport::Transport;
use witness_workflow::WorkflowEngine;

use crate::DaemonError;

/// Counters reported when the loop exits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BotStats {
    pub events: u64,
    pub sent: u64,
    pub send_failures: u64,
    pub outcomes: u64,
}

pub struct Bot<T: Transport> {
    transport: T,
    engine: WorkflowEngine,
}

impl<T: Transport> Bot<T> {
    pub fn new(transport: T, engine: WorkflowEngine) -> Self {
        Self { transport, engine }
    }

    pub fn engine(&self) -> &WorkflowEngine {
        &self.engine
    }

    /// Process events until the transport stream ends or shutdown is signalled.
    ///
    /// Events are handled strictly one at a time. A failed send is logged and
    /// counted; a failed receive ends the loop with an error.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<BotStats, DaemonError> {
        let mut stats = BotStats::default();
        tracing::info!(transport = self.transport.name(), "bot started");

        loop {
            let event = tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("shutdown requested, leaving event loop");
                    break;
                }
                next = self.transport.next_event() => match next? {
                    Some(event) => event,
                    None => {
                        tracing::info!("transport stream ended");
                        break;
                    }
                },
            };

            stats.events += 1;
            let dispatch = self.engine.handle(&event).await;
            if dispatch.outcome.is_some() {
                stats.outcomes += 1;
            }

            for message in &dispatch.messages {
                match self.transport.send(message).await {
                    Ok(()) => stats.sent += 1,
                    Err(e) => {
                        stats.send_failures += 1;
                        tracing::warn!(recipient = %message.recipient, error = %e, "failed to send message");
                    }
                }
            }
        }

        tracing::info!(
            events = stats.events,
            sent = stats.sent,
            send_failures = stats.send_failures,
            outcomes = stats.outcomes,
            "bot stopped"
        );
        Ok(stats)
    }
}
