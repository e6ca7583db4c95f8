//! HTTP API for gnubridge.
//!
//! JSON over axum under `/api/v2`. Every route sees the optional legacy
//! cookie; write routes additionally require the internal bearer token.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::{ApiError, ErrorCode};
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
