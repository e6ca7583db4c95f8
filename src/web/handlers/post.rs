//! Post handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::board::board_id;
use super::AppState;
use crate::board::{BoardService, Pagination, Post, PostPatch, DEFAULT_PAGE_SIZE};
use crate::web::dto::{
    ApiResponse, CreatePostRequest, LikeResponse, PageQuery, SearchQuery, UpdatePostRequest,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{CurrentIdentity, MemberIdentity};

fn pagination(page: Option<i64>, limit: Option<i64>) -> Pagination {
    Pagination::new(page.unwrap_or(1), limit.unwrap_or(DEFAULT_PAGE_SIZE))
}

/// GET /api/v2/boards/{board_id}/posts
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    Query(query): Query<PageQuery>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<ApiResponse<Vec<Post>>>, ApiError> {
    let board_id = board_id(&raw_id)?;
    let result = BoardService::new(&state.db)
        .list_posts(&board_id, pagination(query.page, query.limit), &identity)
        .await?;
    Ok(Json(ApiResponse::paginated(result, Some(&board_id))))
}

/// GET /api/v2/boards/{board_id}/posts/search?q=
pub async fn search_posts(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    Query(query): Query<SearchQuery>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<ApiResponse<Vec<Post>>>, ApiError> {
    let board_id = board_id(&raw_id)?;
    let result = BoardService::new(&state.db)
        .search_posts(
            &board_id,
            &query.q,
            pagination(query.page, query.limit),
            &identity,
        )
        .await?;
    Ok(Json(ApiResponse::paginated(result, Some(&board_id))))
}

/// GET /api/v2/boards/{board_id}/posts/{id}
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path((raw_id, id)): Path<(String, i64)>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<ApiResponse<Post>>, ApiError> {
    let post = BoardService::new(&state.db)
        .get_post(&board_id(&raw_id)?, id, &identity)
        .await?;
    Ok(Json(ApiResponse::new(post)))
}

/// POST /api/v2/boards/{board_id}/posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    MemberIdentity(identity): MemberIdentity,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Post>>), ApiError> {
    let post = BoardService::new(&state.db)
        .create_post(&board_id(&raw_id)?, req.into(), &identity)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(post))))
}

/// PUT /api/v2/boards/{board_id}/posts/{id}
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path((raw_id, id)): Path<(String, i64)>,
    MemberIdentity(identity): MemberIdentity,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> Result<StatusCode, ApiError> {
    BoardService::new(&state.db)
        .update_post(&board_id(&raw_id)?, id, &PostPatch::from(req), &identity)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v2/boards/{board_id}/posts/{id}
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path((raw_id, id)): Path<(String, i64)>,
    MemberIdentity(identity): MemberIdentity,
) -> Result<StatusCode, ApiError> {
    BoardService::new(&state.db)
        .delete_post(&board_id(&raw_id)?, id, &identity)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v2/boards/{board_id}/posts/{id}/like
pub async fn like_post(
    State(state): State<Arc<AppState>>,
    Path((raw_id, id)): Path<(String, i64)>,
    MemberIdentity(identity): MemberIdentity,
) -> Result<Json<ApiResponse<LikeResponse>>, ApiError> {
    let likes = BoardService::new(&state.db)
        .like_post(&board_id(&raw_id)?, id, &identity)
        .await?;
    Ok(Json(ApiResponse::new(LikeResponse { likes })))
}

/// DELETE /api/v2/boards/{board_id}/posts/{id}/like
pub async fn unlike_post(
    State(state): State<Arc<AppState>>,
    Path((raw_id, id)): Path<(String, i64)>,
    MemberIdentity(identity): MemberIdentity,
) -> Result<Json<ApiResponse<LikeResponse>>, ApiError> {
    let likes = BoardService::new(&state.db)
        .unlike_post(&board_id(&raw_id)?, id, &identity)
        .await?;
    Ok(Json(ApiResponse::new(LikeResponse { likes })))
}
