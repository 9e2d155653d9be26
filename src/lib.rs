//! Rustodo - a minimal multi-user todo API with GitHub OAuth
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - /v1/auth/callback (OAuth code exchange)                  │
//! │  - /v1/todos CRUD (bearer-token protected)                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Auth Layer                              │
//! │  - AccessValidator (read-through token cache)               │
//! │  - GitHubClient (provider exchange/resolution)              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                              │
//! │  - SQLite (sqlx): todos + token cache                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers for the callback and todo endpoints
//! - `auth`: GitHub OAuth client and bearer-token validation
//! - `data`: Database layer
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// Cloned for each request; all shared resources are behind `Arc`, so a
/// clone is cheap. Stores are injected handles, not process-wide
/// singletons, which keeps the validator testable with substitutes.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database handle (todos + token cache)
    pub db: Arc<data::Database>,

    /// OAuth provider client
    pub provider: Arc<dyn auth::IdentityProvider>,

    /// Bearer-token validator (read-through cache over the provider)
    pub validator: auth::AccessValidator,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Connect to the SQLite database (runs migrations)
    /// 2. Build the GitHub client with the configured deadline
    /// 3. Wire the validator to the database-backed cache and the client
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        let db = Arc::new(data::Database::connect(&config.database.path).await?);

        let provider: Arc<dyn auth::IdentityProvider> = Arc::new(auth::GitHubClient::new(
            config.auth.github.clone(),
            config.provider.timeout(),
        )?);

        let validator = auth::AccessValidator::new(db.clone(), provider.clone());

        Ok(Self {
            config: Arc::new(config),
            db,
            provider,
            validator,
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{cors::CorsLayer, trace::TraceLayer};

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/v1/auth", api::auth_router())
        .nest("/v1/todos", api::todos_router())
        .layer(axum::middleware::from_fn(process_time))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Add API process time in response headers and log calls
async fn process_time(
    req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let mut response = next.run(req).await;

    let elapsed = format!("{:.3}", start.elapsed().as_secs_f64());
    if let Ok(value) = axum::http::HeaderValue::from_str(&elapsed) {
        response.headers_mut().insert("x-process-time", value);
    }

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        process_time = %elapsed,
        "Request handled"
    );

    response
}

async fn health_check() -> &'static str {
    "OK"
}
