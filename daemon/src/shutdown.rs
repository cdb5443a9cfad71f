//! Stops the bot's event loop on SIGINT/SIGTERM.

use std::fmt;
use std::sync::Arc;

use tokio::signal;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// The OS signal that ended the daemon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Interrupt => f.write_str("SIGINT"),
            ShutdownSignal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Broadcasts a single shutdown notification to every subscribed loop.
///
/// [`Bot::run`](crate::Bot::run) selects on a receiver from
/// [`subscribe`](Self::subscribe) next to the transport, so a pending receive
/// is abandoned as soon as shutdown fires. Dropping the controller also
/// releases every receiver.
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger shutdown without an OS signal.
    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }

    /// Wait for SIGINT or SIGTERM, trigger shutdown, and report which one arrived.
    pub async fn wait_for_signal(&self) -> ShutdownSignal {
        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "SIGTERM handler unavailable; only SIGINT stops the bot");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        let received = tokio::select! {
            _ = signal::ctrl_c() => ShutdownSignal::Interrupt,
            _ = terminate => ShutdownSignal::Terminate,
        };
        tracing::info!(signal = %received, "shutting down");

        self.shutdown();
        received
    }

    /// Run [`wait_for_signal`](Self::wait_for_signal) on a background task.
    pub fn spawn_signal_listener(self: &Arc<Self>) -> JoinHandle<ShutdownSignal> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.wait_for_signal().await })
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}
