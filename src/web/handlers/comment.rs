//! Comment handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::board::board_id;
use super::AppState;
use crate::board::{BoardService, Comment, CommentPatch};
use crate::web::dto::{ApiResponse, CreateCommentRequest, UpdateCommentRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::{CurrentIdentity, MemberIdentity};

/// GET /api/v2/boards/{board_id}/posts/{post_id}/comments
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path((raw_id, post_id)): Path<(String, i64)>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<ApiResponse<Vec<Comment>>>, ApiError> {
    let comments = BoardService::new(&state.db)
        .list_comments(&board_id(&raw_id)?, post_id, &identity)
        .await?;
    Ok(Json(ApiResponse::new(comments)))
}

/// GET /api/v2/boards/{board_id}/posts/{post_id}/comments/{id}
pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    Path((raw_id, post_id, id)): Path<(String, i64, i64)>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<ApiResponse<Comment>>, ApiError> {
    let comment = BoardService::new(&state.db)
        .get_comment(&board_id(&raw_id)?, post_id, id, &identity)
        .await?;
    Ok(Json(ApiResponse::new(comment)))
}

/// POST /api/v2/boards/{board_id}/posts/{post_id}/comments
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Path((raw_id, post_id)): Path<(String, i64)>,
    MemberIdentity(identity): MemberIdentity,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Comment>>), ApiError> {
    let comment = BoardService::new(&state.db)
        .create_comment(&board_id(&raw_id)?, post_id, req.into(), &identity)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(comment))))
}

/// PUT /api/v2/boards/{board_id}/posts/{post_id}/comments/{id}
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    Path((raw_id, post_id, id)): Path<(String, i64, i64)>,
    MemberIdentity(identity): MemberIdentity,
    ValidatedJson(req): ValidatedJson<UpdateCommentRequest>,
) -> Result<StatusCode, ApiError> {
    let patch = CommentPatch::default().content(req.content);
    BoardService::new(&state.db)
        .update_comment(&board_id(&raw_id)?, post_id, id, &patch, &identity)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v2/boards/{board_id}/posts/{post_id}/comments/{id}
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path((raw_id, post_id, id)): Path<(String, i64, i64)>,
    MemberIdentity(identity): MemberIdentity,
) -> Result<StatusCode, ApiError> {
    BoardService::new(&state.db)
        .delete_comment(&board_id(&raw_id)?, post_id, id, &identity)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
