//! Resolves attachment references into uploadable payloads.

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::Payload;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use witness_types::PendingPhoto;

/// Turns the transport's opaque attachment reference into bytes.
#[async_trait]
pub trait PayloadLoader: Send + Sync {
    async fn load(&self, photo: &PendingPhoto) -> Result<Payload, GatewayError>;
}

/// Reads attachments stored on the local filesystem (signald writes every
/// received attachment to its attachments directory).
pub struct FsPayloadLoader {
    base_dir: Option<PathBuf>,
    max_bytes: u64,
}

impl FsPayloadLoader {
    pub fn new(base_dir: Option<PathBuf>, max_bytes: u64) -> Self {
        Self {
            base_dir,
            max_bytes,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.attachments_dir.clone(), config.max_payload_bytes)
    }

    /// Absolute references are used as-is; relative ones are joined to `base_dir`.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl PayloadLoader for FsPayloadLoader {
    async fn load(&self, photo: &PendingPhoto) -> Result<Payload, GatewayError> {
        let path = self.resolve(&photo.reference);
        let payload_err = |reason: String| GatewayError::Payload {
            reference: photo.reference.clone(),
            reason,
        };

        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| payload_err(format!("{}: {e}", path.display())))?;
        if !meta.is_file() {
            return Err(payload_err(format!("{} is not a file", path.display())));
        }
        if meta.len() > self.max_bytes {
            return Err(payload_err(format!(
                "{} bytes exceeds the {} byte limit",
                meta.len(),
                self.max_bytes
            )));
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| payload_err(format!("{}: {e}", path.display())))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| photo.reference.clone());

        Ok(Payload {
            bytes,
            mime_type: photo.content_type.clone(),
            file_name,
        })
    }
}
