//! Verification of tokens issued by the legacy site.
//!
//! The legacy site signs its own cookie token with a secret this service
//! only verifies against. The check is optional: a missing or bad cookie
//! leaves the caller anonymous.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::token::TokenError;

/// Claims in the legacy cookie token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalClaims {
    #[serde(rename = "mb_id")]
    pub member_id: String,
    #[serde(rename = "mb_name", default)]
    pub name: String,
    #[serde(rename = "mb_level")]
    pub level: i64,
    #[serde(rename = "mb_email", default)]
    pub email: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,
}

/// Verifier for the legacy trust domain.
#[derive(Clone)]
pub struct ExternalTokenBridge {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl ExternalTokenBridge {
    /// Create a bridge that trusts tokens signed with `secret`.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_nbf = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a cookie token.
    pub fn verify(&self, token: &str) -> Result<ExternalClaims, TokenError> {
        decode::<ExternalClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }

    /// Verify a cookie token if one was sent. Failures degrade to `None`.
    pub fn verify_optional(&self, token: Option<&str>) -> Option<ExternalClaims> {
        let token = token.filter(|t| !t.is_empty())?;
        match self.verify(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("external cookie ignored: {}", e);
                None
            }
        }
    }
}
