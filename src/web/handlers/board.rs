//! Board management handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::board::{Board, BoardId, BoardService, BoardUpdate, Pagination, DEFAULT_PAGE_SIZE};
use crate::web::dto::{
    ApiResponse, CreateBoardRequest, MessageResponse, PageQuery, UpdateBoardRequest,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::MemberIdentity;

/// Parse a board id from the path; malformed ids are a 400.
pub(crate) fn board_id(raw: &str) -> Result<BoardId, ApiError> {
    Ok(BoardId::parse(raw)?)
}

/// GET /api/v2/boards
pub async fn list_boards(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Board>>>, ApiError> {
    let per_page = query.page_size.or(query.limit).unwrap_or(DEFAULT_PAGE_SIZE);
    let pagination = Pagination::new(query.page.unwrap_or(1), per_page);

    let result = BoardService::new(&state.db).list_boards(pagination).await?;
    Ok(Json(ApiResponse::paginated(result, None)))
}

/// GET /api/v2/groups/{group_id}/boards
pub async fn list_group_boards(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Board>>>, ApiError> {
    let boards = BoardService::new(&state.db)
        .list_boards_by_group(&group_id)
        .await?;
    Ok(Json(ApiResponse::new(boards)))
}

/// GET /api/v2/boards/{board_id}
pub async fn get_board(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<Board>>, ApiError> {
    let board = BoardService::new(&state.db)
        .get_board(&board_id(&raw_id)?)
        .await?;
    Ok(Json(ApiResponse::new(board)))
}

/// POST /api/v2/boards
pub async fn create_board(
    State(state): State<Arc<AppState>>,
    MemberIdentity(identity): MemberIdentity,
    ValidatedJson(req): ValidatedJson<CreateBoardRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Board>>), ApiError> {
    let new_board = req.into_new_board()?;
    let board = BoardService::new(&state.db)
        .create_board(&new_board, &identity)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(board))))
}

/// PUT /api/v2/boards/{board_id}
pub async fn update_board(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    MemberIdentity(identity): MemberIdentity,
    ValidatedJson(req): ValidatedJson<UpdateBoardRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let update = BoardUpdate::from(req);
    BoardService::new(&state.db)
        .update_board(&board_id(&raw_id)?, &update, &identity)
        .await?;
    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Board updated successfully",
    ))))
}

/// DELETE /api/v2/boards/{board_id}
pub async fn delete_board(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    MemberIdentity(identity): MemberIdentity,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    BoardService::new(&state.db)
        .delete_board(&board_id(&raw_id)?, &identity)
        .await?;
    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Board deleted successfully",
    ))))
}
