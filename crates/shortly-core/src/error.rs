use thiserror::Error;

/// Errors raised by the pure parts of the core (codec and token parsing).
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("short link not found: {0}")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl From<CoreError> for StoreError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidArgument(message) => Self::InvalidData(message),
        }
    }
}
