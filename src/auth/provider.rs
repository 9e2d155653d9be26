//! GitHub OAuth provider client
//!
//! Two outbound operations against the provider: exchanging an
//! authorization code for an access token, and resolving an access token
//! to a GitHub login. Single attempt per call, no retries; callers decide
//! fallback behavior.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GitHubOAuthConfig;
use crate::error::{AppError, OAuthError};

/// External identity provider seam
///
/// Implemented by [`GitHubClient`] in production; tests substitute their
/// own implementations to count and script provider calls.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an authorization code for a provider access token
    async fn exchange_code(&self, code: &str) -> Result<String, OAuthError>;

    /// Resolve a provider access token to a username
    async fn resolve_user(&self, access_token: &str) -> Result<String, OAuthError>;
}

/// GitHub token endpoint response
///
/// GitHub answers 200 even for rejected exchanges, signalling failure
/// through the `error` fields, so every field here is optional and the
/// presence checks are explicit.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// GitHub identity endpoint response
#[derive(Debug, Deserialize)]
struct UserResponse {
    login: Option<String>,
}

/// HTTP client for the GitHub OAuth endpoints
pub struct GitHubClient {
    http: reqwest::Client,
    config: GitHubOAuthConfig,
}

impl GitHubClient {
    /// Build a client with a per-request deadline
    ///
    /// The timeout applies to every provider call so a stalled provider
    /// cannot hold a request open indefinitely.
    pub fn new(config: GitHubOAuthConfig, timeout: std::time::Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl IdentityProvider for GitHubClient {
    /// POST client credentials + code to the token endpoint
    ///
    /// An error payload maps to `OAuthError::ProviderRejected` with the
    /// provider's own message; a 2xx body without an access token is
    /// `Unresolvable`, never a raw success.
    async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let response = self
            .http
            .post(self.config.token_url())
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "client_id": self.config.client_id,
                "client_secret": self.config.client_secret,
                "code": code,
                "redirect_uri": self.config.redirect_uri,
            }))
            .send()
            .await?;

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|_| OAuthError::Unresolvable)?;

        if let Some(error) = payload.error {
            let description = payload.error_description.unwrap_or_default();
            return Err(OAuthError::ProviderRejected(format!(
                "{error}: {description}"
            )));
        }

        match payload.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(OAuthError::Unresolvable),
        }
    }

    /// GET the identity endpoint with a bearer header
    ///
    /// Only an HTTP 200 carrying a non-empty `login` field counts as a
    /// resolution; anything else is `Unresolvable`.
    async fn resolve_user(&self, access_token: &str) -> Result<String, OAuthError> {
        let response = self
            .http
            .get(self.config.user_url())
            .header("Authorization", format!("Bearer {access_token}"))
            .header("User-Agent", "rustodo")
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(OAuthError::Unresolvable);
        }

        let payload: UserResponse = response
            .json()
            .await
            .map_err(|_| OAuthError::Unresolvable)?;

        match payload.login {
            Some(login) if !login.is_empty() => Ok(login),
            _ => Err(OAuthError::Unresolvable),
        }
    }
}
