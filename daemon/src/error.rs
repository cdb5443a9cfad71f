use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("config error: {0}")]
    Config(String),

    #[error("gateway error: {0}")]
    Gateway(#[from] witness_gateway::GatewayError),

    #[error("transport error: {0}")]
    Transport(#[from] witness_transport::TransportError),
}
