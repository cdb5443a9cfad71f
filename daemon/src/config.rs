//! Daemon configuration with TOML file support.
//!
//! ```toml
//! log_level = "info"
//! log_format = "json"
//!
//! [transport]
//! kind = "signald"
//! account = "+15550000000"
//!
//! [gateway]
//! api_url = "http://127.0.0.1:5001"
//! public_gateway = "https://ipfs.io"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use witness_gateway::GatewayConfig;
use witness_transport::signald::DEFAULT_SOCKET_PATH;
use witness_utils::LogFormat;

use crate::DaemonError;

/// Which chat transport the daemon speaks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Signald,
    Console,
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "signald" | "signal" => Ok(TransportKind::Signald),
            "console" | "stdio" => Ok(TransportKind::Console),
            other => Err(format!("unknown transport: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default)]
    pub kind: TransportKind,

    /// signald control socket.
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,

    /// The bot's own Signal number. Required for signald.
    #[serde(default)]
    pub account: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::default(),
            socket_path: default_socket_path(),
            account: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Tell registered verifiers when a new photo has been archived.
    #[serde(default = "default_true")]
    pub notify_verifiers: bool,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_socket_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_PATH)
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, DaemonError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DaemonError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, DaemonError> {
        toml::from_str(s).map_err(|e| DaemonError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, DaemonError> {
        toml::to_string_pretty(self).map_err(|e| DaemonError::Config(e.to_string()))
    }

    /// Check the settings the daemon cannot start without.
    pub fn validate(&self) -> Result<(), DaemonError> {
        self.gateway.validate()?;
        if self.transport.kind == TransportKind::Signald
            && self
                .transport
                .account
                .as_deref()
                .map_or(true, |a| a.trim().is_empty())
        {
            return Err(DaemonError::Config(
                "the signald transport needs an account (set --account, WITNESS_ACCOUNT or SIGNAL_PHONE_NUMBER)"
                    .into(),
            ));
        }
        Ok(())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            notify_verifiers: default_true(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            transport: TransportConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}
