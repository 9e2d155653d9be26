//! OAuth callback endpoint
//!
//! GitHub redirects here with an authorization code; the code is exchanged
//! for an access token, the token is resolved to a login, and the
//! resolution is cached so the first authenticated request skips the
//! provider round-trip.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::auth::token_hash;
use crate::error::{AppError, OAuthError};

/// Create authentication router
///
/// Routes:
/// - GET /callback - OAuth callback from GitHub
pub fn auth_router() -> Router<AppState> {
    Router::new().route("/callback", get(oauth_callback))
}

/// Query parameters from the GitHub redirect
#[derive(Debug, Deserialize)]
struct CallbackQuery {
    /// Authorization code
    code: String,
}

/// Successful callback response
#[derive(Debug, Serialize)]
struct OauthToken {
    access_token: String,
}

/// GET /v1/auth/callback
///
/// # Steps
/// 1. Exchange the authorization code for an access token
/// 2. Resolve the access token to a GitHub login
/// 3. Cache the resolution under the token's hash
/// 4. Return the access token to the client
///
/// A provider error payload surfaces as 400 with the provider's message;
/// an unreachable or misbehaving provider surfaces as 502.
async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<OauthToken>, AppError> {
    let access_token = state
        .provider
        .exchange_code(&query.code)
        .await
        .map_err(map_callback_error)?;

    let user = state
        .provider
        .resolve_user(&access_token)
        .await
        .map_err(map_callback_error)?;

    state
        .db
        .insert_token(&token_hash(&access_token), &user, Utc::now())
        .await?;

    tracing::info!(user = %user, "OAuth callback completed");

    Ok(Json(OauthToken { access_token }))
}

fn map_callback_error(error: OAuthError) -> AppError {
    match error {
        OAuthError::ProviderRejected(message) => AppError::ProviderRejected(message),
        OAuthError::Unresolvable => {
            AppError::Upstream("Provider did not return a usable identity".to_string())
        }
        OAuthError::Transport(error) => {
            tracing::warn!(error = %error, "OAuth provider unreachable during callback");
            AppError::Upstream("Provider unreachable".to_string())
        }
    }
}
