/// Server error types
use annil_core::AnnilError;
use annil_storage::StorageError;
use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Header carrying a machine-readable reason on account-form rejections
pub const STATUS_REASON_HEADER: &str = "x-status-reason";

#[derive(Debug, Error)]
pub enum ServerError {
    /// Missing, forged, expired, or revoked credential
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Valid credential, resource outside its grant
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Account form rejected for a reason the client is expected to display
    #[error("Rejected ({status}): {reason}")]
    Rejected {
        status: StatusCode,
        reason: &'static str,
    },

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] AnnilError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl ServerError {
    pub fn rejected(status: StatusCode, reason: &'static str) -> Self {
        Self::Rejected { status, reason }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Auth(_) => (StatusCode::UNAUTHORIZED, "Unauthenticated".to_string()),
            ServerError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Rejected { status, reason } => {
                let mut response = (status, Json(json!({ "error": reason }))).into_response();
                response
                    .headers_mut()
                    .insert(STATUS_REASON_HEADER, HeaderValue::from_static(reason));
                return response;
            }
            ServerError::Core(e) => match e {
                AnnilError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
                AnnilError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
                other => {
                    tracing::error!("Core error: {:?}", other);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            ServerError::Storage(e) => match e {
                StorageError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
                StorageError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
                StorageError::Duplicate(msg) => (StatusCode::CONFLICT, msg),
                other => {
                    tracing::error!("Storage error: {:?}", other);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Storage error".to_string(),
                    )
                }
            },
            ServerError::Signing(ref msg) => {
                tracing::error!("Signing error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Token signing failed".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Password error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
