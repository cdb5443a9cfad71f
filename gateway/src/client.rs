//! HTTP client for the IPFS `add` API.

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::{ipfs_url, ArchivalGateway, Payload};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use witness_types::Cid;

/// Uploads payloads to an IPFS node or hosted pinning API.
///
/// Sends `POST {api_url}/api/v0/add` with the payload as the multipart field
/// `file` and reads the CID from the `Hash` field of the JSON reply.
pub struct IpfsGateway {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    config: GatewayConfig,
    timeout: Duration,
}

/// One JSON object from the `add` endpoint.
///
/// The endpoint streams one object per added file; a single upload yields
/// `{"Name": "...", "Hash": "...", "Size": "..."}`.
#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Hash", default)]
    hash: Option<String>,
}

impl IpfsGateway {
    /// Create a gateway with the timeouts from `config`.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let timeout = config.timeout();
        Self::with_timeout(config, timeout)
    }

    /// Create a gateway with a custom request timeout.
    pub fn with_timeout(config: GatewayConfig, timeout: Duration) -> Result<Self, GatewayError> {
        config.validate()?;
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http_client,
            config,
            timeout,
        })
    }
}

#[async_trait]
impl ArchivalGateway for IpfsGateway {
    async fn archive(&self, payload: Payload) -> Result<Cid, GatewayError> {
        let size = payload.bytes.len();
        let part = Part::bytes(payload.bytes)
            .file_name(payload.file_name.clone())
            .mime_str(&payload.mime_type)
            .map_err(|e| GatewayError::Payload {
                reference: payload.file_name.clone(),
                reason: format!("invalid MIME type {}: {e}", payload.mime_type),
            })?;
        let form = Form::new().part("file", part);

        let mut request = self.http_client.post(self.config.add_url()).multipart(form);
        if let Some(ref project_id) = self.config.project_id {
            request = request.basic_auth(project_id, self.config.project_secret.as_ref());
        }

        tracing::debug!(file = %payload.file_name, size, "uploading payload to IPFS");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout(self.timeout)
            } else if e.is_connect() {
                GatewayError::Unreachable(format!("connection failed: {e}"))
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout(self.timeout)
            } else {
                GatewayError::InvalidResponse(format!("failed to read response body: {e}"))
            }
        })?;

        let cid = parse_add_response(&body)?;
        tracing::info!(cid = %cid, file = %payload.file_name, "payload archived");
        Ok(cid)
    }

    fn public_url(&self, cid: &Cid) -> String {
        ipfs_url(&self.config.public_gateway, cid)
    }

    fn name(&self) -> &str {
        "ipfs"
    }
}

/// Extract the CID from an `add` response body.
///
/// The last non-empty line wins, matching the endpoint's streaming output where
/// the final object describes the root of what was added.
pub fn parse_add_response(body: &str) -> Result<Cid, GatewayError> {
    let line = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .ok_or_else(|| GatewayError::InvalidResponse("empty response body".into()))?;

    let parsed: AddResponse = serde_json::from_str(line)
        .map_err(|e| GatewayError::InvalidResponse(format!("failed to parse add response: {e}")))?;

    match parsed.hash {
        Some(hash) if !hash.trim().is_empty() => Ok(Cid::new(hash.trim())),
        _ => {
            tracing::warn!(name = ?parsed.name, "add response without Hash field");
            Err(GatewayError::MissingCid)
        }
    }
}
