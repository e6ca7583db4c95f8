//! Board service for gnubridge.
//!
//! Gated operations over boards and their content. Each call resolves the
//! board, checks the caller's capability level, then delegates to the
//! repository, provisioner or content store.

use crate::auth::{require_capability, AccessClaims, Identity};
use crate::db::Database;
use crate::{GnubridgeError, Result};

use super::content::{Comment, CommentPatch, NewComment, NewPost, Post, PostPatch};
use super::content_store::ContentStore;
use super::provisioner::BoardProvisioner;
use super::repository::BoardRepository;
use super::types::{Board, BoardId, BoardUpdate, Capability, NewBoard, PaginatedResult, Pagination};

/// Member level never stands in for authorship on posts and comments.
const NO_OVERRIDE: bool = false;

/// Service for board operations with permission checking.
pub struct BoardService<'a> {
    db: &'a Database,
}

impl<'a> BoardService<'a> {
    /// Create a new BoardService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn store(&self) -> ContentStore<'a> {
        ContentStore::new(self.db)
    }

    /// List boards ordered by `bo_order`, then id.
    pub async fn list_boards(&self, pagination: Pagination) -> Result<PaginatedResult<Board>> {
        let (items, total) = BoardRepository::new(self.db.pool()).list(pagination).await?;
        Ok(PaginatedResult {
            items,
            total,
            pagination,
        })
    }

    /// List the boards of one group.
    pub async fn list_boards_by_group(&self, group_id: &str) -> Result<Vec<Board>> {
        BoardRepository::new(self.db.pool())
            .list_by_group(group_id)
            .await
    }

    /// Get a board by id.
    pub async fn get_board(&self, board_id: &BoardId) -> Result<Board> {
        BoardRepository::new(self.db.pool())
            .get(board_id)
            .await?
            .ok_or_else(|| GnubridgeError::NotFound(format!("board '{board_id}'")))
    }

    /// Create a board. Admins only; the caller becomes its `bo_admin`.
    pub async fn create_board(&self, new_board: &NewBoard, identity: &Identity) -> Result<Board> {
        let claims = require_member(identity)?;
        require_admin(identity)?;
        BoardProvisioner::new(self.db)
            .create_board(new_board, &claims.sub)
            .await
    }

    /// Update board settings. Allowed for admins and the board's own admin.
    pub async fn update_board(
        &self,
        board_id: &BoardId,
        update: &BoardUpdate,
        identity: &Identity,
    ) -> Result<Board> {
        let claims = require_member(identity)?;
        let board = self.get_board(board_id).await?;
        if !identity.is_admin() && (board.admin.is_empty() || board.admin != claims.sub) {
            return Err(GnubridgeError::Forbidden(format!(
                "not allowed to manage board '{board_id}'"
            )));
        }
        if update.is_empty() {
            return Ok(board);
        }

        BoardRepository::new(self.db.pool())
            .update(board_id, update)
            .await?
            .ok_or_else(|| GnubridgeError::NotFound(format!("board '{board_id}'")))
    }

    /// Delete a board and everything stored in it. Admins only.
    pub async fn delete_board(&self, board_id: &BoardId, identity: &Identity) -> Result<()> {
        require_member(identity)?;
        require_admin(identity)?;
        BoardProvisioner::new(self.db).delete_board(board_id).await
    }

    /// List root posts, newest first.
    pub async fn list_posts(
        &self,
        board_id: &BoardId,
        pagination: Pagination,
        identity: &Identity,
    ) -> Result<PaginatedResult<Post>> {
        self.gate(board_id, Capability::List, identity.effective_level())
            .await?;
        self.store().list_posts(board_id, pagination).await
    }

    /// Search root posts by title and body.
    pub async fn search_posts(
        &self,
        board_id: &BoardId,
        keyword: &str,
        pagination: Pagination,
        identity: &Identity,
    ) -> Result<PaginatedResult<Post>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(GnubridgeError::InvalidInput(
                "search keyword is required".to_string(),
            ));
        }
        self.gate(board_id, Capability::List, identity.effective_level())
            .await?;
        self.store().search_posts(board_id, keyword, pagination).await
    }

    /// Read one post.
    pub async fn get_post(&self, board_id: &BoardId, id: i64, identity: &Identity) -> Result<Post> {
        self.gate(board_id, Capability::Read, identity.effective_level())
            .await?;
        self.store().get_post(board_id, id).await
    }

    /// Write a root post as the authenticated member.
    pub async fn create_post(
        &self,
        board_id: &BoardId,
        new_post: NewPost,
        identity: &Identity,
    ) -> Result<Post> {
        let claims = require_member(identity)?;
        self.gate(board_id, Capability::Write, claims.level).await?;

        let mut new_post = new_post;
        if new_post.author.is_empty() {
            new_post.author = claims.nickname.clone();
        }
        self.store()
            .create_post(board_id, &new_post, &claims.sub)
            .await
    }

    /// Edit a post. Only its author may do so.
    pub async fn update_post(
        &self,
        board_id: &BoardId,
        id: i64,
        patch: &PostPatch,
        identity: &Identity,
    ) -> Result<()> {
        let claims = require_member(identity)?;
        self.store()
            .update_post(board_id, id, &claims.sub, patch, NO_OVERRIDE)
            .await
    }

    /// Delete a post and its comments. Only its author may do so.
    pub async fn delete_post(&self, board_id: &BoardId, id: i64, identity: &Identity) -> Result<()> {
        let claims = require_member(identity)?;
        self.store()
            .delete_post(board_id, id, &claims.sub, NO_OVERRIDE)
            .await
    }

    /// Like a post.
    pub async fn like_post(&self, board_id: &BoardId, id: i64, identity: &Identity) -> Result<i64> {
        let claims = require_member(identity)?;
        self.gate(board_id, Capability::Read, claims.level).await?;
        self.store().increment_like(board_id, id).await
    }

    /// Withdraw a like.
    pub async fn unlike_post(&self, board_id: &BoardId, id: i64, identity: &Identity) -> Result<i64> {
        let claims = require_member(identity)?;
        self.gate(board_id, Capability::Read, claims.level).await?;
        self.store().decrement_like(board_id, id).await
    }

    /// Comments of a post, oldest first.
    pub async fn list_comments(
        &self,
        board_id: &BoardId,
        post_id: i64,
        identity: &Identity,
    ) -> Result<Vec<Comment>> {
        self.gate(board_id, Capability::Read, identity.effective_level())
            .await?;
        self.store().list_comments(board_id, post_id).await
    }

    /// One comment of a post.
    pub async fn get_comment(
        &self,
        board_id: &BoardId,
        post_id: i64,
        id: i64,
        identity: &Identity,
    ) -> Result<Comment> {
        self.gate(board_id, Capability::Read, identity.effective_level())
            .await?;
        self.comment_of(board_id, post_id, id).await
    }

    /// Comment on a post as the authenticated member.
    pub async fn create_comment(
        &self,
        board_id: &BoardId,
        post_id: i64,
        new_comment: NewComment,
        identity: &Identity,
    ) -> Result<Comment> {
        let claims = require_member(identity)?;
        self.gate(board_id, Capability::Comment, claims.level)
            .await?;

        let mut new_comment = new_comment;
        if new_comment.author.is_empty() {
            new_comment.author = claims.nickname.clone();
        }
        self.store()
            .create_comment(board_id, post_id, &new_comment, &claims.sub)
            .await
    }

    /// Edit a comment. Only its author may do so.
    pub async fn update_comment(
        &self,
        board_id: &BoardId,
        post_id: i64,
        id: i64,
        patch: &CommentPatch,
        identity: &Identity,
    ) -> Result<()> {
        let claims = require_member(identity)?;
        self.comment_of(board_id, post_id, id).await?;
        self.store()
            .update_comment(board_id, id, &claims.sub, patch, NO_OVERRIDE)
            .await
    }

    /// Delete a comment. Only its author may do so.
    pub async fn delete_comment(
        &self,
        board_id: &BoardId,
        post_id: i64,
        id: i64,
        identity: &Identity,
    ) -> Result<()> {
        let claims = require_member(identity)?;
        self.comment_of(board_id, post_id, id).await?;
        self.store()
            .delete_comment(board_id, id, &claims.sub, NO_OVERRIDE)
            .await
    }

    async fn gate(&self, board_id: &BoardId, capability: Capability, level: i64) -> Result<Board> {
        let board = self.get_board(board_id).await?;
        require_capability(&board, capability, level)?;
        Ok(board)
    }

    /// Comment `id`, which must belong to `post_id`.
    async fn comment_of(&self, board_id: &BoardId, post_id: i64, id: i64) -> Result<Comment> {
        let comment = self.store().get_comment(board_id, id).await?;
        if comment.parent_id != post_id {
            return Err(GnubridgeError::NotFound(format!(
                "comment {id} on post {post_id}"
            )));
        }
        Ok(comment)
    }
}

fn require_member(identity: &Identity) -> Result<&AccessClaims> {
    identity
        .internal
        .as_ref()
        .ok_or_else(|| GnubridgeError::Unauthorized("authentication required".to_string()))
}

fn require_admin(identity: &Identity) -> Result<()> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(GnubridgeError::Forbidden(
            "administrator level required".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ExternalClaims;

    fn member(user_id: &str, level: i64) -> Identity {
        Identity {
            internal: Some(AccessClaims {
                sub: user_id.to_string(),
                nickname: format!("{user_id}-nick"),
                level,
                exp: 0,
                iat: 0,
                nbf: 0,
            }),
            external: None,
        }
    }

    fn legacy(level: i64) -> Identity {
        Identity {
            internal: None,
            external: Some(ExternalClaims {
                member_id: "legacy".to_string(),
                name: "Legacy".to_string(),
                level,
                email: String::new(),
                exp: 0,
                iat: None,
                nbf: None,
            }),
        }
    }

    fn id(s: &str) -> BoardId {
        BoardId::parse(s).unwrap()
    }

    async fn setup(new_board: NewBoard) -> Database {
        let db = Database::open_in_memory().await.unwrap();
        BoardService::new(&db)
            .create_board(&new_board, &member("admin", 10))
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_board_management_requires_admin() {
        let db = Database::open_in_memory().await.unwrap();
        let service = BoardService::new(&db);
        let new_board = NewBoard::new(id("free"), "g", "Free");

        let result = service.create_board(&new_board, &Identity::anonymous()).await;
        assert!(matches!(result, Err(GnubridgeError::Unauthorized(_))));

        let result = service.create_board(&new_board, &member("alice", 9)).await;
        assert!(matches!(result, Err(GnubridgeError::Forbidden(_))));

        // A legacy cookie never grants management rights.
        let result = service.create_board(&new_board, &legacy(10)).await;
        assert!(matches!(result, Err(GnubridgeError::Unauthorized(_))));

        let board = service.create_board(&new_board, &member("root", 10)).await.unwrap();
        assert_eq!(board.admin, "root");

        let result = service.delete_board(&id("free"), &member("alice", 9)).await;
        assert!(matches!(result, Err(GnubridgeError::Forbidden(_))));
        service.delete_board(&id("free"), &member("root", 10)).await.unwrap();
        assert!(matches!(
            service.get_board(&id("free")).await,
            Err(GnubridgeError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_board_by_board_admin() {
        let db = setup(NewBoard::new(id("free"), "g", "Free")).await;
        let service = BoardService::new(&db);

        // The creator "admin" is the board's own admin, even at a low level.
        let board = service
            .update_board(&id("free"), &BoardUpdate::new().subject("Renamed"), &member("admin", 2))
            .await
            .unwrap();
        assert_eq!(board.subject, "Renamed");

        let result = service
            .update_board(&id("free"), &BoardUpdate::new().write_level(5), &member("bob", 5))
            .await;
        assert!(matches!(result, Err(GnubridgeError::Forbidden(_))));

        let board = service
            .update_board(&id("free"), &BoardUpdate::new().write_level(5), &member("root", 10))
            .await
            .unwrap();
        assert_eq!(board.write_level, 5);
    }

    #[tokio::test]
    async fn test_read_gate_uses_effective_level() {
        let db = setup(
            NewBoard::new(id("vip"), "g", "VIP")
                .with_list_level(3)
                .with_read_level(3),
        )
        .await;
        let service = BoardService::new(&db);

        let result = service
            .list_posts(&id("vip"), Pagination::default(), &Identity::anonymous())
            .await;
        assert!(matches!(result, Err(GnubridgeError::Forbidden(_))));

        // The legacy cookie level counts for reading.
        let page = service
            .list_posts(&id("vip"), Pagination::default(), &legacy(3))
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_write_gate_needs_internal_token() {
        let db = setup(NewBoard::new(id("qa"), "g", "Q&A").with_write_level(3)).await;
        let service = BoardService::new(&db);
        let new_post = NewPost::new("T", "C", "");

        let result = service.create_post(&id("qa"), new_post.clone(), &legacy(10)).await;
        assert!(matches!(result, Err(GnubridgeError::Unauthorized(_))));

        let result = service
            .create_post(&id("qa"), new_post.clone(), &member("alice", 2))
            .await;
        assert!(matches!(result, Err(GnubridgeError::Forbidden(_))));

        let post = service
            .create_post(&id("qa"), new_post, &member("alice", 3))
            .await
            .unwrap();
        assert_eq!(post.author_id, "alice");
        assert_eq!(post.author, "alice-nick");
    }

    #[tokio::test]
    async fn test_empty_search_keyword() {
        let db = setup(NewBoard::new(id("free"), "g", "Free")).await;
        let result = BoardService::new(&db)
            .search_posts(&id("free"), "  ", Pagination::default(), &Identity::anonymous())
            .await;
        assert!(matches!(result, Err(GnubridgeError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_admin_level_does_not_grant_content_ownership() {
        let db = setup(NewBoard::new(id("free"), "g", "Free")).await;
        let service = BoardService::new(&db);
        let alice = member("alice", 2);
        let root = member("root", 10);
        let post = service
            .create_post(&id("free"), NewPost::new("T", "C", ""), &alice)
            .await
            .unwrap();
        let comment = service
            .create_comment(&id("free"), post.id, NewComment::new("hi", ""), &alice)
            .await
            .unwrap();

        let patch = PostPatch::default().title("hijacked");
        let result = service.update_post(&id("free"), post.id, &patch, &root).await;
        assert!(matches!(result, Err(GnubridgeError::Unauthorized(_))));
        let result = service.delete_post(&id("free"), post.id, &root).await;
        assert!(matches!(result, Err(GnubridgeError::Unauthorized(_))));

        let result = service
            .update_comment(
                &id("free"),
                post.id,
                comment.id,
                &CommentPatch::default().content("hijacked"),
                &root,
            )
            .await;
        assert!(matches!(result, Err(GnubridgeError::Unauthorized(_))));
        let result = service
            .delete_comment(&id("free"), post.id, comment.id, &root)
            .await;
        assert!(matches!(result, Err(GnubridgeError::Unauthorized(_))));

        let post = service
            .get_post(&id("free"), post.id, &Identity::anonymous())
            .await
            .unwrap();
        assert_eq!(post.title, "T");

        service
            .delete_post(&id("free"), post.id, &alice)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_comment_must_belong_to_post() {
        let db = setup(NewBoard::new(id("free"), "g", "Free")).await;
        let service = BoardService::new(&db);
        let alice = member("alice", 2);
        let first = service
            .create_post(&id("free"), NewPost::new("A", "C", ""), &alice)
            .await
            .unwrap();
        let second = service
            .create_post(&id("free"), NewPost::new("B", "C", ""), &alice)
            .await
            .unwrap();
        let comment = service
            .create_comment(&id("free"), first.id, NewComment::new("hi", ""), &alice)
            .await
            .unwrap();
        assert_eq!(comment.author, "alice-nick");

        let result = service
            .get_comment(&id("free"), second.id, comment.id, &alice)
            .await;
        assert!(matches!(result, Err(GnubridgeError::NotFound(_))));

        let result = service
            .delete_comment(&id("free"), second.id, comment.id, &alice)
            .await;
        assert!(matches!(result, Err(GnubridgeError::NotFound(_))));

        service
            .delete_comment(&id("free"), first.id, comment.id, &alice)
            .await
            .unwrap();
    }
}
