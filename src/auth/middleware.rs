//! Authentication extractor
//!
//! Protects routes that require a resolved identity.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};

use super::validator::AuthenticatedUser;
use crate::AppState;
use crate::error::AppError;

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Extractor for the current authenticated user
///
/// Reads the `Authorization: Bearer` header and runs it through the
/// access validator. A missing or malformed header rejects with 403
/// before any validation work; a token the validator cannot resolve
/// rejects with 401.
///
/// # Usage
/// ```ignore
/// async fn handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}", user.as_str())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token =
            extract_bearer_token(&parts.headers).ok_or(AppError::MissingCredentials)?;

        let state = AppState::from_ref(state);
        let user = state.validator.validate(token).await?;

        Ok(CurrentUser(user))
    }
}
