//! Content archival gateway.
//!
//! The workflow engine hands a photo payload to an [`ArchivalGateway`] and gets
//! back a content identifier. The production gateway is the IPFS HTTP API
//! ([`IpfsGateway`]); tests swap in a scripted double.
//!
//! Attachments arrive from the transport as opaque references, so a
//! [`PayloadLoader`] turns a reference into bytes before upload.

pub mod client;
pub mod config;
pub mod error;
pub mod loader;

pub use client::IpfsGateway;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use loader::{FsPayloadLoader, PayloadLoader};

use async_trait::async_trait;
use witness_types::Cid;

/// A binary payload ready for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

/// Trait for uploading payloads to a content-addressed store.
#[async_trait]
pub trait ArchivalGateway: Send + Sync {
    /// Upload the payload and return its content identifier.
    async fn archive(&self, payload: Payload) -> Result<Cid, GatewayError>;

    /// Public URL under which an archived CID can be viewed.
    fn public_url(&self, cid: &Cid) -> String;

    /// Human-readable name of this gateway.
    fn name(&self) -> &str;
}

/// Build `{base}/ipfs/{cid}` from a public gateway base URL.
pub fn ipfs_url(public_gateway: &str, cid: &Cid) -> String {
    format!("{}/ipfs/{}", public_gateway.trim_end_matches('/'), cid)
}
