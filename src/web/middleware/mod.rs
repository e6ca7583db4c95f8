//! Middleware and extractors for the HTTP API.

pub mod auth;
pub mod cors;

pub use auth::{AuthUser, CurrentIdentity, LegacyUser, MemberIdentity};
pub use cors::create_cors_layer;
