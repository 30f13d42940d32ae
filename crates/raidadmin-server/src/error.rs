//! Error handling for the admin server

use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use raidadmin::{AdminError, html::escape};
use thiserror::Error;
use tracing::{debug, warn};

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Server error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Admin(#[from] AdminError),

    /// No credentials were presented
    #[error("Authentication required")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Unauthorized = self {
            return (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"admin\"")],
                "Unauthorized",
            )
                .into_response();
        }

        let (status, message) = match &self {
            ApiError::Admin(e) => {
                let status = match e {
                    AdminError::AccessDenied { .. } => StatusCode::FORBIDDEN,
                    AdminError::MissingScript | AdminError::RaidNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    AdminError::UnknownAction(_) | AdminError::Validation(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    AdminError::DataFile { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    AdminError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    AdminError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if e.is_recoverable() {
                    debug!("Rejected form submission: {}", e);
                } else {
                    warn!("Admin action failed: {}", e);
                }
                (status, e.user_message())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Внутренняя ошибка сервера".to_string(),
            ),
        };

        let body = Html(format!(
            "<div class=\"short_result\">{}</div>\r\n",
            escape(&message)
        ));

        (status, body).into_response()
    }
}

impl ApiError {
    pub fn bad_request(msg: &str) -> Self {
        Self::BadRequest(msg.to_string())
    }
}
