//! Request DTOs for Web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{no_control_chars, not_empty_trimmed, single_line_text};
use crate::board::{BoardId, BoardUpdate, NewBoard, NewComment, NewPost, PostPatch};
use crate::Result;

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Token refresh request.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

/// Board creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    /// Checked by [`BoardId::parse`] in `into_new_board`.
    pub board_id: String,
    #[validate(length(min = 1, message = "group_id is required"))]
    pub group_id: String,
    #[validate(
        length(min = 1, max = 255, message = "subject must be 1-255 characters"),
        custom(function = "no_control_chars")
    )]
    pub subject: String,
    pub device: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub list_level: Option<i64>,
    #[validate(range(min = 1, max = 10))]
    pub read_level: Option<i64>,
    #[validate(range(min = 1, max = 10))]
    pub write_level: Option<i64>,
    #[validate(range(min = 1, max = 10))]
    pub reply_level: Option<i64>,
    #[validate(range(min = 1, max = 10))]
    pub comment_level: Option<i64>,
    pub use_category: Option<i64>,
    #[serde(default)]
    pub category_list: String,
    pub skin: Option<String>,
    pub mobile_skin: Option<String>,
    #[validate(range(min = 1))]
    pub page_rows: Option<i64>,
    #[validate(range(min = 0))]
    pub upload_count: Option<i64>,
    #[validate(range(min = 0))]
    pub upload_size: Option<i64>,
}

impl CreateBoardRequest {
    /// Convert into a validated [`NewBoard`].
    pub fn into_new_board(self) -> Result<NewBoard> {
        let mut new_board = NewBoard::new(BoardId::parse(&self.board_id)?, self.group_id, self.subject);
        new_board.device = self.device.filter(|d| !d.is_empty());
        new_board.list_level = self.list_level;
        new_board.read_level = self.read_level;
        new_board.write_level = self.write_level;
        new_board.reply_level = self.reply_level;
        new_board.comment_level = self.comment_level;
        new_board.use_category = self.use_category;
        new_board.category_list = self.category_list;
        new_board.skin = self.skin.filter(|s| !s.is_empty());
        new_board.mobile_skin = self.mobile_skin.filter(|s| !s.is_empty());
        new_board.page_rows = self.page_rows;
        new_board.upload_count = self.upload_count;
        new_board.upload_size = self.upload_size;
        Ok(new_board)
    }
}

/// Board update request. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBoardRequest {
    #[validate(length(min = 1, max = 255), custom(function = "no_control_chars"))]
    pub subject: Option<String>,
    pub admin: Option<String>,
    pub device: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub list_level: Option<i64>,
    #[validate(range(min = 1, max = 10))]
    pub read_level: Option<i64>,
    #[validate(range(min = 1, max = 10))]
    pub write_level: Option<i64>,
    #[validate(range(min = 1, max = 10))]
    pub reply_level: Option<i64>,
    #[validate(range(min = 1, max = 10))]
    pub comment_level: Option<i64>,
    pub use_category: Option<i64>,
    pub category_list: Option<String>,
    pub skin: Option<String>,
    pub mobile_skin: Option<String>,
    #[validate(range(min = 1))]
    pub page_rows: Option<i64>,
    #[validate(range(min = 0))]
    pub upload_count: Option<i64>,
    #[validate(range(min = 0))]
    pub upload_size: Option<i64>,
}

impl From<UpdateBoardRequest> for BoardUpdate {
    fn from(req: UpdateBoardRequest) -> Self {
        BoardUpdate {
            subject: req.subject,
            admin: req.admin,
            device: req.device,
            list_level: req.list_level,
            read_level: req.read_level,
            write_level: req.write_level,
            reply_level: req.reply_level,
            comment_level: req.comment_level,
            use_category: req.use_category,
            category_list: req.category_list,
            skin: req.skin,
            mobile_skin: req.mobile_skin,
            page_rows: req.page_rows,
            upload_count: req.upload_count,
            upload_size: req.upload_size,
        }
    }
}

/// Post creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(
        length(min = 1, max = 200, message = "title must be 1-200 characters"),
        custom(function = "single_line_text")
    )]
    pub title: String,
    #[validate(custom(function = "not_empty_trimmed"))]
    pub content: String,
    #[serde(default)]
    pub category: String,
    /// Display name; the member's nickname when empty.
    #[serde(default)]
    #[validate(length(max = 50))]
    pub author: String,
    #[serde(default)]
    pub password: String,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        NewPost {
            title: req.title,
            content: req.content,
            category: req.category,
            author: req.author,
            password: req.password,
        }
    }
}

/// Post update request. Empty fields are ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(max = 200), custom(function = "no_control_chars"))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl From<UpdatePostRequest> for PostPatch {
    fn from(req: UpdatePostRequest) -> Self {
        PostPatch {
            title: req.title,
            content: req.content,
            category: req.category,
        }
    }
}

/// Comment creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(custom(function = "not_empty_trimmed"))]
    pub content: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub author: String,
}

impl From<CreateCommentRequest> for NewComment {
    fn from(req: CreateCommentRequest) -> Self {
        NewComment::new(req.content, req.author)
    }
}

/// Comment update request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(custom(function = "not_empty_trimmed"))]
    pub content: String,
}

/// Paging query for content listings (`?page=&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Board listings also accept `page_size`.
    pub page_size: Option<i64>,
}

/// Search query (`?q=&page=&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_board_request_validation() {
        let req: CreateBoardRequest = serde_json::from_str(
            r#"{"board_id": "free", "group_id": "community", "subject": "Free", "write_level": 2}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        let new_board = req.into_new_board().unwrap();
        assert_eq!(new_board.board_id.as_str(), "free");
        assert_eq!(new_board.write_level, Some(2));
        assert_eq!(new_board.read_level, None);

        let req: CreateBoardRequest = serde_json::from_str(
            r#"{"board_id": "free-board", "group_id": "g", "subject": "x"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(matches!(
            req.into_new_board(),
            Err(crate::GnubridgeError::InvalidInput(_))
        ));

        let req: CreateBoardRequest = serde_json::from_str(
            r#"{"board_id": "free", "group_id": "g", "subject": "x", "read_level": 11}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_post_request_validation() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title": "T", "content": "C"}"#).unwrap();
        assert!(req.validate().is_ok());
        let new_post = NewPost::from(req);
        assert!(new_post.author.is_empty());

        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title": "   ", "content": "C"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title": "T", "content": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_board_request_into_update() {
        let req: UpdateBoardRequest = serde_json::from_str(r#"{"subject": "New"}"#).unwrap();
        let update = BoardUpdate::from(req);
        assert_eq!(update.subject.as_deref(), Some("New"));
        assert!(update.write_level.is_none());
    }
}
