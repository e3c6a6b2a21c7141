use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::token_exchange::UpstreamBody;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Server misconfigured: {0}")]
    ServerMisconfigured(String),

    #[error("Token exchange rejected by provider")]
    UpstreamRejected { status: u16, data: UpstreamBody },

    #[error("Token exchange failed: {0}")]
    Transport(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Error body. Checkout failures carry `success: false`, the provider
/// rejection carries the upstream status and body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<UpstreamBody>,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::UpstreamRejected { .. } => StatusCode::BAD_GATEWAY,
            Self::ServerMisconfigured(_) | Self::Transport(_) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let success = match self {
            Self::MalformedPayload(_) | Self::Database(_) => Some(false),
            _ => None,
        };

        let (status, data) = match self {
            Self::UpstreamRejected { status, data } => (Some(*status), Some(data.clone())),
            _ => (None, None),
        };

        ErrorResponse {
            success,
            error: self.to_string(),
            status,
            data,
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status.as_u16(), "Request rejected");
        }

        let body = Json(self.to_response());

        if matches!(self, Self::MethodNotAllowed) {
            return (status, [(header::ALLOW, "POST")], body).into_response();
        }

        (status, body).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
