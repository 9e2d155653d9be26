//! Bearer-token validation
//!
//! A read-through cache in front of the OAuth provider: a bearer token is
//! hashed, looked up in the token cache, and only on a miss resolved
//! against the provider. Successful resolutions are written back so the
//! provider is consulted at most once per token.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::data::{CachedToken, Database};
use crate::error::{AppError, OAuthError, StoreError};

use super::provider::IdentityProvider;

/// Compute the cache key for a raw bearer token
///
/// Lowercase hex SHA-256. This is the single hashing function used for
/// cache keys everywhere; raw tokens are never persisted or logged.
pub fn token_hash(raw_token: &str) -> String {
    hex::encode(Sha256::digest(raw_token.as_bytes()))
}

/// A resolved request identity
///
/// Opaque username string, used downstream only as an equality-comparable
/// partition key for todo ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Token cache seam
///
/// Implemented on [`Database`]; tests substitute in-memory or failing
/// stores. Entries have no expiry and no revocation path — they live until
/// explicitly purged.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Pure read; absence is not an error
    async fn lookup(&self, token_hash: &str) -> Result<Option<CachedToken>, StoreError>;

    /// Upsert keyed by `token_hash`; last write wins
    async fn insert(
        &self,
        token_hash: &str,
        user: &str,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl TokenCache for Database {
    async fn lookup(&self, token_hash: &str) -> Result<Option<CachedToken>, StoreError> {
        self.lookup_token(token_hash).await
    }

    async fn insert(
        &self,
        token_hash: &str,
        user: &str,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.insert_token(token_hash, user, created_at).await
    }
}

/// Validates bearer tokens into request identities
///
/// Holds no cross-request state; both collaborators are injected so the
/// validator stays testable with substitute stores and providers.
#[derive(Clone)]
pub struct AccessValidator {
    cache: Arc<dyn TokenCache>,
    provider: Arc<dyn IdentityProvider>,
}

impl AccessValidator {
    pub fn new(cache: Arc<dyn TokenCache>, provider: Arc<dyn IdentityProvider>) -> Self {
        Self { cache, provider }
    }

    /// Resolve a raw bearer token to a username
    ///
    /// A cache hit authorizes immediately with no provider revalidation —
    /// stale or revoked tokens stay valid until the cache entry is purged.
    /// On a miss the token is resolved against the provider and, on
    /// success, written back best-effort: a cache-write failure still
    /// authorizes the request.
    ///
    /// # Errors
    /// - `Unauthorized` when the provider rejects or cannot resolve the token
    /// - `Store` / `Unavailable` when the cache or the provider network is
    ///   down (retryable, distinct from an authentication failure)
    pub async fn validate(&self, raw_token: &str) -> Result<AuthenticatedUser, AppError> {
        let hash = token_hash(raw_token);

        match self.cache.lookup(&hash).await {
            Ok(Some(cached)) if !cached.user.is_empty() => {
                return Ok(AuthenticatedUser(cached.user));
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(error = %error, "Token cache lookup failed");
                return Err(AppError::Store(error));
            }
        }

        let user = match self.provider.resolve_user(raw_token).await {
            Ok(login) if !login.is_empty() => login,
            Ok(_) | Err(OAuthError::ProviderRejected(_)) | Err(OAuthError::Unresolvable) => {
                return Err(AppError::Unauthorized);
            }
            Err(OAuthError::Transport(error)) => {
                tracing::warn!(error = %error, "Identity provider unreachable");
                return Err(AppError::Unavailable(
                    "Identity provider unreachable".to_string(),
                ));
            }
        };

        // Read-through correctness takes priority over cache completeness:
        // a failed write-back must not fail the request.
        if let Err(error) = self.cache.insert(&hash, &user, Utc::now()).await {
            tracing::warn!(error = %error, user = %user, "Token cache write-back failed");
        }

        Ok(AuthenticatedUser(user))
    }
}
