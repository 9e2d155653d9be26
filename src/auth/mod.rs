//! GitHub OAuth authentication
//!
//! Handles:
//! - Provider code/token exchange (GitHub)
//! - Read-through bearer-token validation
//! - Request identity extraction

mod middleware;
mod provider;
mod validator;

pub use middleware::CurrentUser;
pub use provider::{GitHubClient, IdentityProvider};
pub use validator::{AccessValidator, AuthenticatedUser, TokenCache, token_hash};
