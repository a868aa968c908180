use std::result::Result as StdResult;
use thiserror::Error;

/// Failures while starting or talking to a disposable Redis container.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("failed to start or inspect the redis container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("failed to connect to the redis container: {0}")]
    Redis(#[from] redis::RedisError),
}

pub type Result<T> = StdResult<T, TestInfraError>;
