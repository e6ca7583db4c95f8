//! API handlers.

pub mod auth;
pub mod board;
pub mod comment;
pub mod menu;
pub mod post;

pub use auth::*;
pub use board::*;
pub use comment::*;
pub use menu::*;
pub use post::*;

use crate::auth::{ExternalTokenBridge, TokenAuthority};
use crate::config::Config;
use crate::db::Database;

/// Application state shared across handlers.
pub struct AppState {
    pub db: Database,
    /// Internal trust domain.
    pub tokens: TokenAuthority,
    /// Legacy trust domain.
    pub external: ExternalTokenBridge,
    /// Name of the legacy site's session cookie.
    pub external_cookie_name: String,
}

impl AppState {
    /// Build the state from a connected database and the loaded config.
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db,
            tokens: TokenAuthority::from_config(&config.jwt),
            external: ExternalTokenBridge::new(&config.jwt.external_secret),
            external_cookie_name: config.jwt.external_cookie_name.clone(),
        }
    }
}
