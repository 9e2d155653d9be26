//! Common test utilities for E2E tests
//!
//! Spins up the real router against a stub GitHub provider so the OAuth
//! round-trips stay on localhost.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{Json, Router, extract::State, http::HeaderMap, routing::get, routing::post};
use chrono::Utc;
use rustodo::auth::token_hash;
use rustodo::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
    /// How many times the stub provider's identity endpoint was hit
    pub provider_user_calls: Arc<AtomicUsize>,
}

impl TestServer {
    /// Create a new test server instance
    ///
    /// Starts a stub GitHub provider on an OS-assigned port, points the
    /// application config at it, and serves the real router.
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Start the stub provider first so its address can go in the config
        let provider_user_calls = Arc::new(AtomicUsize::new(0));
        let provider_addr = spawn_stub_provider(provider_user_calls.clone()).await;

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            database: config::DatabaseConfig {
                path: db_path.clone(),
            },
            auth: config::AuthConfig {
                github: config::GitHubOAuthConfig {
                    client_id: "test-client-id".to_string(),
                    client_secret: "test-client-secret".to_string(),
                    redirect_uri: "http://localhost:8000/v1/auth/callback".to_string(),
                    auth_base_url: format!("http://{provider_addr}"),
                    api_base_url: format!("http://{provider_addr}"),
                },
            },
            provider: config::ProviderConfig { timeout_seconds: 5 },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        let state = AppState::new(config).await.unwrap();
        let app = rustodo::build_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{addr}");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::new();

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
            provider_user_calls,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Seed the token cache directly, bypassing the provider
    pub async fn seed_cached_token(&self, raw_token: &str, user: &str) {
        self.state
            .db
            .insert_token(&token_hash(raw_token), user, Utc::now())
            .await
            .unwrap();
    }

    pub fn provider_user_call_count(&self) -> usize {
        self.provider_user_calls.load(Ordering::SeqCst)
    }
}

/// Tokens the stub provider recognizes, mapped to logins
fn stub_login_for(token: &str) -> Option<&'static str> {
    match token {
        "GOOD_TOKEN" => Some("octocat"),
        "ALICE_TOKEN" => Some("alice"),
        "BOB_TOKEN" => Some("bob"),
        _ => None,
    }
}

#[derive(Clone)]
struct StubState {
    user_calls: Arc<AtomicUsize>,
}

/// Start a stub GitHub provider and return its bound address
///
/// Implements just enough of the two endpoints the application calls:
/// - POST /login/oauth/access_token
/// - GET /user
async fn spawn_stub_provider(user_calls: Arc<AtomicUsize>) -> std::net::SocketAddr {
    let router = Router::new()
        .route("/login/oauth/access_token", post(stub_token_exchange))
        .route("/user", get(stub_user))
        .with_state(StubState { user_calls });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

/// GitHub answers 200 for rejected exchanges and signals failure in the body.
async fn stub_token_exchange(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
    let code = body.get("code").and_then(|c| c.as_str()).unwrap_or("");

    match code {
        "good-code" => Json(serde_json::json!({
            "access_token": "GOOD_TOKEN",
            "token_type": "bearer",
            "scope": "",
        })),
        "empty-token-code" => Json(serde_json::json!({
            "token_type": "bearer",
            "scope": "",
        })),
        _ => Json(serde_json::json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired.",
        })),
    }
}

async fn stub_user(
    State(state): State<StubState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    state.user_calls.fetch_add(1, Ordering::SeqCst);

    let token = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .unwrap_or("");

    match stub_login_for(token) {
        Some(login) => Ok(Json(serde_json::json!({
            "login": login,
            "id": 583231,
        }))),
        None => Err(axum::http::StatusCode::UNAUTHORIZED),
    }
}
