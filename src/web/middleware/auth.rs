//! Identity extractors for both trust domains.
//!
//! The internal bearer token is checked by [`TokenAuthority`]; the legacy
//! cookie is checked by [`ExternalTokenBridge`]. The two results sit side
//! by side in an [`Identity`] and are never merged.
//!
//! [`TokenAuthority`]: crate::auth::TokenAuthority
//! [`ExternalTokenBridge`]: crate::auth::ExternalTokenBridge

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

use crate::auth::{AccessClaims, ExternalClaims, Identity};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::GnubridgeError;

/// Bearer token from the Authorization header, if any.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify the bearer token if one was sent.
///
/// A token that is present but fails verification is an error, so clients
/// learn to refresh instead of silently browsing as a guest.
fn internal_claims(parts: &Parts, state: &AppState) -> Result<Option<AccessClaims>, ApiError> {
    let Some(token) = bearer_token(parts) else {
        return Ok(None);
    };
    state
        .tokens
        .verify(token)
        .map(Some)
        .map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            ApiError::from(GnubridgeError::from(e))
        })
}

/// Verify the legacy cookie. Failure degrades to no claims.
fn external_claims(parts: &Parts, state: &AppState) -> Option<ExternalClaims> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(&state.external_cookie_name).map(|c| c.value().to_string());
    state.external.verify_optional(token.as_deref())
}

/// Extractor for routes that require the internal bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessClaims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        internal_claims(parts, state)?
            .map(AuthUser)
            .ok_or_else(ApiError::missing_token)
    }
}

/// Extractor for the caller's identity from both domains.
///
/// Neither token is required. Handlers that need a member pass the
/// identity to a service call that enforces it.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let internal = internal_claims(parts, state)?;
        let external = external_claims(parts, state);
        Ok(CurrentIdentity(Identity { internal, external }))
    }
}

/// Extractor for routes that require the internal bearer token but also
/// want the legacy cookie alongside it.
#[derive(Debug, Clone)]
pub struct MemberIdentity(pub Identity);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MemberIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        let external = external_claims(parts, state);
        Ok(MemberIdentity(Identity {
            internal: Some(claims),
            external,
        }))
    }
}

/// Extractor for the legacy cookie identity alone.
#[derive(Debug, Clone)]
pub struct LegacyUser(pub Option<ExternalClaims>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for LegacyUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(LegacyUser(external_claims(parts, state)))
    }
}
