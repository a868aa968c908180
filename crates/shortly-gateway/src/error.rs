use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use shortly_core::StoreError;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("short link not found")]
    NotFound,
    #[error("storage failure: {0}")]
    Storage(StoreError),
    #[error("stored target cannot be used as a redirect: {0}")]
    InvalidTarget(String),
    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(_) => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Html("<h1>Not Found</h1><p>The requested short link does not exist.</p>"),
            )
                .into_response(),
            other => {
                // Internal detail stays in the logs.
                error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>Internal Server Error</h1>"),
                )
                    .into_response()
            }
        }
    }
}
