//! Configuration module for gnubridge.

use serde::Deserialize;
use std::path::Path;

use crate::{GnubridgeError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means permissive (development).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (`sqlite://...` or `postgres://...`).
    #[serde(default = "default_db_url")]
    pub url: String,
    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_url() -> String {
    "sqlite://data/gnubridge.db".to_string()
}

fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/gnubridge.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Token configuration for both trust domains.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret for internally issued access/refresh tokens.
    #[serde(default)]
    pub secret: String,
    /// Secret of the external legacy site that signs the cookie token.
    #[serde(default)]
    pub external_secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_expiry")]
    pub refresh_token_expiry_secs: u64,
    /// Name of the cookie carrying the external token.
    #[serde(default = "default_external_cookie_name")]
    pub external_cookie_name: String,
}

fn default_access_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_expiry() -> u64 {
    604_800 // 7 days
}

fn default_external_cookie_name() -> String {
    "damoang_jwt".to_string()
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            external_secret: String::new(),
            access_token_expiry_secs: default_access_expiry(),
            refresh_token_expiry_secs: default_refresh_expiry(),
            external_cookie_name: default_external_cookie_name(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Token configuration.
    #[serde(default)]
    pub jwt: JwtConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(GnubridgeError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| GnubridgeError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `JWT_SECRET`: internal token secret
    /// - `EXTERNAL_JWT_SECRET`: external cookie token secret
    /// - `DATABASE_URL`: database connection URL
    /// - `API_PORT`: HTTP port (ignored if it does not parse)
    pub fn apply_env_overrides(&mut self) {
        if let Some(secret) = non_empty_env("JWT_SECRET") {
            self.jwt.secret = secret;
        }
        if let Some(secret) = non_empty_env("EXTERNAL_JWT_SECRET") {
            self.jwt.external_secret = secret;
        }
        if let Some(url) = non_empty_env("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(port) = non_empty_env("API_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Validate the configuration.
    ///
    /// Both trust domains need a secret, and the secrets must differ.
    pub fn validate(&self) -> Result<()> {
        if self.jwt.secret.is_empty() {
            return Err(GnubridgeError::Config(
                "jwt.secret is not set. Set it in config.toml or via JWT_SECRET.".to_string(),
            ));
        }
        if self.jwt.external_secret.is_empty() {
            return Err(GnubridgeError::Config(
                "jwt.external_secret is not set. Set it in config.toml or via EXTERNAL_JWT_SECRET."
                    .to_string(),
            ));
        }
        if self.jwt.secret == self.jwt.external_secret {
            return Err(GnubridgeError::Config(
                "jwt.secret and jwt.external_secret must differ".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
