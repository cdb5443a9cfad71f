//! Nullable archival gateway — scripted CIDs and failures.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use witness_gateway::{ipfs_url, ArchivalGateway, GatewayError, Payload};
use witness_types::Cid;

/// Public gateway base used in URLs produced by [`NullGateway`].
pub const NULL_PUBLIC_GATEWAY: &str = "https://ipfs.null";

/// A gateway that returns queued results instead of uploading.
///
/// When the queue is empty every upload succeeds with a generated CID
/// (`bafynull1`, `bafynull2`, ...).
pub struct NullGateway {
    script: Mutex<VecDeque<Result<Cid, GatewayError>>>,
    uploads: Mutex<Vec<Payload>>,
    generated: AtomicU64,
    delay: Option<Duration>,
}

impl NullGateway {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            uploads: Mutex::new(Vec::new()),
            generated: AtomicU64::new(0),
            delay: None,
        }
    }

    /// Sleep this long inside every upload.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful upload returning `cid`.
    pub fn push_ok(&self, cid: &str) {
        self.script.lock().unwrap().push_back(Ok(Cid::new(cid)));
    }

    /// Queue a failed upload.
    pub fn push_err(&self, err: GatewayError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    /// Payloads received so far, including those whose upload was scripted to fail.
    pub fn uploads(&self) -> Vec<Payload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

impl Default for NullGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArchivalGateway for NullGateway {
    async fn archive(&self, payload: Payload) -> Result<Cid, GatewayError> {
        self.uploads.lock().unwrap().push(payload);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            let n = self.generated.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Cid::new(format!("bafynull{n}")))
        })
    }

    fn public_url(&self, cid: &Cid) -> String {
        ipfs_url(NULL_PUBLIC_GATEWAY, cid)
    }

    fn name(&self) -> &str {
        "null"
    }
}
