//! Error types for gnubridge.

use thiserror::Error;

/// Common error type for gnubridge.
#[derive(Error, Debug)]
pub enum GnubridgeError {
    /// Database error.
    ///
    /// Wraps errors from any database backend. Errors from sqlx are
    /// converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found (board, post, comment, member).
    #[error("{0} not found")]
    NotFound(String),

    /// Unique identifier collision.
    #[error("{0} already exists")]
    Duplicate(String),

    /// Missing identity or bad credentials. Also used for ownership mismatches.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Capability threshold not met.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Malformed input such as an invalid board id.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Token signature is valid but the token has expired.
    #[error("expired token")]
    ExpiredToken,

    /// Token failed verification.
    #[error("invalid token")]
    InvalidToken,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Token could not be signed.
    #[error("token signing error: {0}")]
    TokenSigning(String),
}

impl From<sqlx::Error> for GnubridgeError {
    fn from(e: sqlx::Error) -> Self {
        GnubridgeError::Database(e.to_string())
    }
}

/// Result type alias for gnubridge operations.
pub type Result<T> = std::result::Result<T, GnubridgeError>;
