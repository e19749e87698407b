use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("disconnected from device")]
    Disconnected,
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to send message: {0:#}")]
    Transport(anyhow::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    #[error("Please select a network from the scan list.")]
    MissingSsid,
    #[error("No password provided. Confirm to continue with an open connection.")]
    OpenNetworkNotConfirmed,
}
