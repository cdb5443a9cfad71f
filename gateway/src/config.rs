//! Gateway configuration, embedded in the daemon's TOML file under `[gateway]`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::GatewayError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the IPFS HTTP API (the `/api/v0/add` endpoint lives under it).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the public gateway used in links sent to verifiers.
    #[serde(default = "default_public_gateway")]
    pub public_gateway: String,

    /// CID version requested from the API: 0 or 1.
    #[serde(default = "default_cid_version")]
    pub cid_version: u8,

    /// Upper bound on a whole archival (payload load + upload).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Basic-auth user for hosted APIs such as Infura.
    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub project_secret: Option<String>,

    /// Directory that relative attachment references are resolved against.
    #[serde(default)]
    pub attachments_dir: Option<PathBuf>,

    /// Payloads larger than this are refused before upload.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_api_url() -> String {
    "https://ipfs.infura.io:5001".to_string()
}

fn default_public_gateway() -> String {
    "https://ipfs.io".to_string()
}

fn default_cid_version() -> u8 {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_max_payload_bytes() -> u64 {
    25 * 1024 * 1024
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// The full `add` endpoint URL including query parameters.
    pub fn add_url(&self) -> String {
        format!(
            "{}/api/v0/add?cid-version={}&raw-leaves=false",
            self.api_url.trim_end_matches('/'),
            self.cid_version
        )
    }

    /// Reject settings the gateway cannot work with.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.cid_version > 1 {
            return Err(GatewayError::Config(format!(
                "cid_version must be 0 or 1, got {}",
                self.cid_version
            )));
        }
        for (name, url) in [("api_url", &self.api_url), ("public_gateway", &self.public_gateway)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(GatewayError::Config(format!("{name} must be an http(s) URL: {url}")));
            }
        }
        if self.timeout_secs == 0 {
            return Err(GatewayError::Config("timeout_secs must be positive".into()));
        }
        if self.project_secret.is_some() && self.project_id.is_none() {
            return Err(GatewayError::Config(
                "project_secret is set without project_id".into(),
            ));
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            public_gateway: default_public_gateway(),
            cid_version: default_cid_version(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            project_id: None,
            project_secret: None,
            attachments_dir: None,
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}
