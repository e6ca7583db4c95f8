//! Authentication handlers.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use super::AppState;
use crate::auth::AuthService;
use crate::web::dto::{
    ApiResponse, LegacyUserResponse, LoginRequest, LoginResponse, MessageResponse,
    ProfileResponse, RefreshRequest, TokenPairResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, LegacyUser};

/// Cookie the logout handler clears.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// POST /api/v2/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let result = AuthService::new(&state.db, &state.tokens)
        .login(&req.user_id, &req.password)
        .await?;

    tracing::info!(user_id = %result.user.mb_id, "member logged in");

    Ok(Json(ApiResponse::new(LoginResponse {
        user: result.user,
        access_token: result.access_token,
        refresh_token: result.refresh_token,
    })))
}

/// POST /api/v2/auth/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenPairResponse>>, ApiError> {
    let pair = AuthService::new(&state.db, &state.tokens)
        .refresh(&req.refresh_token)
        .await?;

    Ok(Json(ApiResponse::new(TokenPairResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    })))
}

/// POST /api/v2/auth/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<MessageResponse>>) {
    let mut cleared = Cookie::build((REFRESH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build();
    // Sent even when the request carried no cookie.
    cleared.make_removal();

    (
        jar.add(cleared),
        Json(ApiResponse::new(MessageResponse::new(
            "Logged out successfully",
        ))),
    )
}

/// GET /api/v2/auth/profile
pub async fn profile(AuthUser(claims): AuthUser) -> Json<ApiResponse<ProfileResponse>> {
    Json(ApiResponse::new(ProfileResponse {
        user_id: claims.sub,
        nickname: claims.nickname,
        level: claims.level,
    }))
}

/// GET /api/v2/auth/me
///
/// Reports the legacy cookie identity; `data` is null without one.
pub async fn me(LegacyUser(claims): LegacyUser) -> Json<ApiResponse<Option<LegacyUserResponse>>> {
    Json(ApiResponse::new(claims.map(|c| LegacyUserResponse {
        mb_id: c.member_id,
        mb_name: c.name,
        mb_level: c.level,
        mb_email: c.email,
    })))
}
