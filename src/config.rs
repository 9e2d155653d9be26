//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/default.toml, config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub provider: ProviderConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8000)
    pub port: u16,
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub github: GitHubOAuthConfig,
}

/// GitHub OAuth application credentials and endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubOAuthConfig {
    /// OAuth app client ID
    pub client_id: String,
    /// OAuth app client secret
    pub client_secret: String,
    /// Redirect URI registered with the OAuth app
    pub redirect_uri: String,
    /// Authorization host (e.g., "https://github.com")
    ///
    /// Overridable so tests can point at a stub provider.
    pub auth_base_url: String,
    /// API host (e.g., "https://api.github.com")
    pub api_base_url: String,
}

impl GitHubOAuthConfig {
    /// Token exchange endpoint
    pub fn token_url(&self) -> String {
        format!("{}/login/oauth/access_token", self.auth_base_url)
    }

    /// Authenticated-user identity endpoint
    pub fn user_url(&self) -> String {
        format!("{}/user", self.api_base_url)
    }
}

/// Outbound provider call settings
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Per-request deadline for calls to the OAuth provider, in seconds
    pub timeout_seconds: u64,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format ("pretty" or "json")
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (RUSTODO_*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("database.path", "data/rustodo.db")?
            .set_default("auth.github.redirect_uri", "http://localhost:8000/v1/auth/callback")?
            .set_default("auth.github.auth_base_url", "https://github.com")?
            .set_default("auth.github.api_base_url", "https://api.github.com")?
            .set_default("provider.timeout_seconds", 10)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (RUSTODO_*)
            .add_source(
                Environment::with_prefix("RUSTODO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        if self.auth.github.client_id.is_empty() {
            return Err(crate::error::AppError::Config(
                "auth.github.client_id must be set".to_string(),
            ));
        }
        if self.auth.github.client_secret.is_empty() {
            return Err(crate::error::AppError::Config(
                "auth.github.client_secret must be set".to_string(),
            ));
        }
        if self.provider.timeout_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "provider.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                path: PathBuf::from("/tmp/rustodo-test.db"),
            },
            auth: AuthConfig {
                github: GitHubOAuthConfig {
                    client_id: "test-client-id".to_string(),
                    client_secret: "test-client-secret".to_string(),
                    redirect_uri: "http://localhost:8000/v1/auth/callback".to_string(),
                    auth_base_url: "https://github.com".to_string(),
                    api_base_url: "https://api.github.com".to_string(),
                },
            },
            provider: ProviderConfig { timeout_seconds: 10 },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    #[test]
    fn validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_client_secret() {
        let mut config = valid_config();
        config.auth.github.client_secret = String::new();

        let error = config
            .validate()
            .expect_err("empty client secret must fail");
        assert!(matches!(
            error,
            crate::error::AppError::Config(message)
                if message.contains("auth.github.client_secret")
        ));
    }

    #[test]
    fn github_endpoints_derive_from_base_urls() {
        let config = valid_config();
        assert_eq!(
            config.auth.github.token_url(),
            "https://github.com/login/oauth/access_token"
        );
        assert_eq!(config.auth.github.user_url(), "https://api.github.com/user");
    }
}
