//! Internally issued access and refresh tokens.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::JwtConfig;
use crate::{GnubridgeError, Result};

/// Why a token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature checks out but `exp` has passed.
    #[error("token expired")]
    Expired,
    /// Anything else: bad signature, wrong algorithm, wrong shape.
    #[error("invalid token")]
    Invalid,
}

impl From<TokenError> for GnubridgeError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => GnubridgeError::ExpiredToken,
            TokenError::Invalid => GnubridgeError::InvalidToken,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        }
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Member login id (`mb_id`).
    pub sub: String,
    pub nickname: String,
    pub level: i64,
    pub exp: u64,
    pub iat: u64,
    pub nbf: u64,
}

/// Claims carried by a refresh token. Only the member id is trusted; the
/// rest is re-read from storage on refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshClaims {
    pub sub: String,
    pub exp: u64,
    pub iat: u64,
    pub nbf: u64,
}

/// Issues and verifies tokens signed with the service's own secret.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl TokenAuthority {
    /// Create an authority from a shared HMAC secret and token lifetimes.
    pub fn new(secret: &str, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        // Only HS256 is accepted, whatever the header claims.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Create an authority from the `[jwt]` configuration section.
    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(
            &config.secret,
            config.access_token_expiry_secs,
            config.refresh_token_expiry_secs,
        )
    }

    /// Access token lifetime in seconds.
    pub fn access_ttl_secs(&self) -> u64 {
        self.access_ttl_secs
    }

    /// Issue a short-lived access token.
    pub fn issue_access_token(&self, user_id: &str, nickname: &str, level: i64) -> Result<String> {
        let now = unix_now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            nickname: nickname.to_string(),
            level,
            exp: now + self.access_ttl_secs,
            iat: now,
            nbf: now,
        };
        self.sign(&claims)
    }

    /// Issue a refresh token carrying only the member id.
    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String> {
        let now = unix_now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            exp: now + self.refresh_ttl_secs,
            iat: now,
            nbf: now,
        };
        self.sign(&claims)
    }

    /// Verify an access token.
    pub fn verify(&self, token: &str) -> std::result::Result<AccessClaims, TokenError> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("access token rejected: {}", e);
                TokenError::from(e)
            })
    }

    /// Verify a refresh token. Access tokens are rejected here.
    pub fn verify_refresh(&self, token: &str) -> std::result::Result<RefreshClaims, TokenError> {
        decode::<RefreshClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("refresh token rejected: {}", e);
                TokenError::from(e)
            })
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| GnubridgeError::TokenSigning(e.to_string()))
    }
}

pub(crate) fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
