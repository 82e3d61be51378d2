use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use thiserror::Error;

/// Error body returned by the admin API for any status outside `200..=302`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UpstreamErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub error_description: String,
    #[serde(default)]
    pub error_debug: String,
    #[serde(default)]
    pub status_code: u16,
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(
        "Upstream error {}: {}; {}; {}",
        .0.status_code, .0.error, .0.error_description, .0.error_debug
    )]
    Upstream(UpstreamErrorBody),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Decode error: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("Password mismatch")]
    Mismatch,
    #[error("Credential store error: {0}")]
    Backend(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(e: sea_orm::DbErr) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Handler-level failure. Everything in here ends the request without a redirect.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Missing query parameter `{0}`")]
    MissingChallenge(&'static str),
    #[error(transparent)]
    Admin(#[from] AdminError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Failed to render login form: {0}")]
    Render(#[from] askama::Error),
}

impl FlowError {
    pub fn status(&self) -> StatusCode {
        match self {
            FlowError::MissingChallenge(_) | FlowError::Admin(AdminError::InvalidArgument(_)) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FlowError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Rejected malformed request");
        }
        let body = match status {
            StatusCode::BAD_REQUEST => "Bad request",
            _ => "Internal server error",
        };
        (status, body).into_response()
    }
}
