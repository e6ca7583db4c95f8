//! Menu handlers. Public; a token or legacy cookie only widens what is visible.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::menu::{Menu, MenuList, MenuService};
use crate::web::dto::ApiResponse;
use crate::web::error::ApiError;
use crate::web::middleware::CurrentIdentity;

/// GET /api/v2/menus
pub async fn list_menus(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<ApiResponse<MenuList>>, ApiError> {
    let menus = MenuService::new(&state.db).menus(&identity).await?;
    Ok(Json(ApiResponse::new(menus)))
}

/// GET /api/v2/menus/sidebar
pub async fn list_sidebar_menus(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<ApiResponse<Vec<Menu>>>, ApiError> {
    let menus = MenuService::new(&state.db).sidebar(&identity).await?;
    Ok(Json(ApiResponse::new(menus)))
}

/// GET /api/v2/menus/header
pub async fn list_header_menus(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<ApiResponse<Vec<Menu>>>, ApiError> {
    let menus = MenuService::new(&state.db).header(&identity).await?;
    Ok(Json(ApiResponse::new(menus)))
}
