//! Response DTOs for Web API.

use serde::Serialize;

use crate::board::{BoardId, PaginatedResult};
use crate::db::Member;

/// Envelope for every successful response: `{"data": ..., "meta": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data, meta: None }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Wrap one page of results with its paging metadata.
    pub fn paginated(result: PaginatedResult<T>, board_id: Option<&BoardId>) -> Self {
        Self {
            meta: Some(Meta {
                board_id: board_id.map(|id| id.to_string()),
                page: result.pagination.page,
                limit: result.pagination.per_page,
                total: result.total,
            }),
            data: result.items,
        }
    }
}

/// Paging metadata.
#[derive(Debug, Serialize)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: Member,
    pub access_token: String,
    pub refresh_token: String,
}

/// Rotated token pair.
#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Claims of the internal bearer token.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub nickname: String,
    pub level: i64,
}

/// Identity carried by the legacy site cookie.
#[derive(Debug, Serialize)]
pub struct LegacyUserResponse {
    pub mb_id: String,
    pub mb_name: String,
    pub mb_level: i64,
    pub mb_email: String,
}

/// Like count after a like or unlike.
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub likes: i64,
}
