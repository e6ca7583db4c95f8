//! Authentication module for gnubridge.
//!
//! Two trust domains are handled side by side: tokens this service issues
//! itself, and cookie tokens issued by the legacy site. [`gate`] composes
//! them with per-board capability checks.

pub mod external;
pub mod gate;
mod password;
mod service;
pub mod token;

pub use external::{ExternalClaims, ExternalTokenBridge};
pub use gate::{
    check_ownership, has_capability, is_admin_level, require_capability, Identity, ADMIN_LEVEL,
    GUEST_LEVEL,
};
pub use password::{double_sha1_hash, sha1_hash, verify_password};
pub use service::{AuthService, LoginResult, TokenPair};
pub use token::{AccessClaims, RefreshClaims, TokenAuthority, TokenError};
