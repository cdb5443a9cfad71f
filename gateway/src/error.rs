use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("archival gateway unreachable: {0}")]
    Unreachable(String),

    #[error("archival request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from archival gateway: {0}")]
    InvalidResponse(String),

    #[error("archival gateway response carried no content identifier")]
    MissingCid,

    #[error("archival timed out after {0:?}")]
    Timeout(Duration),

    #[error("could not load payload {reference}: {reason}")]
    Payload { reference: String, reason: String },

    #[error("gateway configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Whether resending the same confirmation might succeed.
    ///
    /// Configuration problems need operator action; everything else may be transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GatewayError::Config(_))
    }
}
