//! gnubridge - HTTP API over a Gnuboard-compatible forum database
//!
//! Serves boards, posts, comments and site menus stored in the legacy schema,
//! authenticating members with its own tokens while also honouring the
//! legacy site's session cookie.

pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod menu;
pub mod web;

pub use auth::{
    check_ownership, has_capability, verify_password, AccessClaims, AuthService, ExternalClaims,
    ExternalTokenBridge, Identity, TokenAuthority, TokenError,
};
pub use board::{
    Board, BoardId, BoardProvisioner, BoardService, Capability, Comment, ContentItem,
    ContentStore, NewBoard, Post,
};
pub use config::Config;
pub use db::{Database, Member, MemberRepository, NewMember};
pub use error::{GnubridgeError, Result};
pub use menu::{Menu, MenuList, MenuService};
pub use web::WebServer;
