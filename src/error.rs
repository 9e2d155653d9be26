//! Error types for Rustodo
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.
//! Every error body has the shape `{"detail": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Token cache / todo store failure
///
/// Storage faults are retryable conditions, distinct from
/// authentication failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage engine unreachable or query failed
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// OAuth provider failure
///
/// Returned by [`crate::auth::IdentityProvider`] operations. The caller
/// decides fallback behavior; the client itself never retries.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// Provider answered with an explicit error payload
    #[error("{0}")]
    ProviderRejected(String),

    /// Provider response did not yield a usable identity
    /// (non-200 status or missing/empty field)
    #[error("provider response did not resolve to a user")]
    Unresolvable,

    /// Transport-level failure (DNS, connect, timeout)
    #[error("provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Application-wide error type
///
/// This enum represents all possible errors that can occur
/// in the application. It implements `IntoResponse` to
/// automatically convert errors to appropriate HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found, or not owned by the requester (404)
    ///
    /// The two cases are deliberately indistinguishable so record
    /// existence never leaks across users.
    #[error("Not Found")]
    NotFound,

    /// Bearer token could not be resolved to a user (401)
    #[error("Unauthorized")]
    Unauthorized,

    /// No `Authorization: Bearer` header on a protected route (403)
    #[error("Not authenticated")]
    MissingCredentials,

    /// OAuth provider rejected the code exchange (400)
    #[error("{0}")]
    ProviderRejected(String),

    /// Provider misbehaved after a successful exchange (502)
    #[error("{0}")]
    Upstream(String),

    /// Transient storage or provider-network fault (503)
    #[error("{0}")]
    Unavailable(String),

    /// Storage error (503)
    #[error("service unavailable")]
    Store(#[from] StoreError),

    /// Request validation error (400)
    #[error("{0}")]
    Validation(String),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Maps each error variant to the appropriate HTTP status code and a
    /// JSON `{"detail": ...}` body. Server-side faults keep their detail
    /// generic; specifics go to the log, not the client.
    fn into_response(self) -> Response {
        use axum::Json;

        let (status, detail) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::MissingCredentials => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::ProviderRejected(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::Store(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        }

        let body = Json(serde_json::json!({
            "detail": detail,
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
