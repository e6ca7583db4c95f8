//! Posts and comments of one board, stored in its `g5_write_*` table.
//!
//! Every operation resolves the board row first, so a missing board is a
//! `NotFound` rather than a SQL error about a missing table.

use sqlx::QueryBuilder;
use tracing::{debug, warn};

use super::content::{
    Comment, CommentPatch, ContentItem, ContentRow, NewComment, NewPost, Post, PostPatch,
    CONTENT_COLUMNS,
};
use super::ordering::{lock_root_order, next_root_num_expr, COMMENT_NUM, COMMENT_ORDER_BY, ROOT_ORDER_BY};
use super::repository::{BoardCounter, BoardRepository};
use super::types::{Board, BoardId, PaginatedResult, Pagination};
use crate::auth::check_ownership;
use crate::db::{now_string, Database, DbBackend, DbPool};
use crate::{GnubridgeError, Result};

/// `wr_option` written on new root posts.
const POST_OPTION: &str = "html1";

/// Board-parameterized store for content rows.
pub struct ContentStore<'a> {
    db: &'a Database,
}

impl<'a> ContentStore<'a> {
    /// Create a new ContentStore.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn pool(&self) -> &DbPool {
        self.db.pool()
    }

    async fn require_board(&self, board_id: &BoardId) -> Result<Board> {
        BoardRepository::new(self.pool())
            .get(board_id)
            .await?
            .ok_or_else(|| GnubridgeError::NotFound(format!("board '{board_id}'")))
    }

    /// List root posts, newest first.
    pub async fn list_posts(
        &self,
        board_id: &BoardId,
        pagination: Pagination,
    ) -> Result<PaginatedResult<Post>> {
        self.require_board(board_id).await?;
        let table = board_id.write_table();

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {table} WHERE wr_is_comment = 0"
        ))
        .fetch_one(self.pool())
        .await
        .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        let query = format!(
            "SELECT {CONTENT_COLUMNS} FROM {table} WHERE wr_is_comment = 0 {ROOT_ORDER_BY}
             LIMIT $1 OFFSET $2"
        );
        let rows: Vec<ContentRow> = sqlx::query_as(&query)
            .bind(pagination.per_page)
            .bind(pagination.offset())
            .fetch_all(self.pool())
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        Ok(PaginatedResult {
            items: rows_into_posts(rows),
            total,
            pagination,
        })
    }

    /// Case-insensitive infix search over title and body of root posts.
    pub async fn search_posts(
        &self,
        board_id: &BoardId,
        keyword: &str,
        pagination: Pagination,
    ) -> Result<PaginatedResult<Post>> {
        self.require_board(board_id).await?;
        let table = board_id.write_table();
        let pattern = like_pattern(keyword);
        let filter = "wr_is_comment = 0 AND (LOWER(wr_subject) LIKE LOWER($1) ESCAPE '\\' \
                      OR LOWER(wr_content) LIKE LOWER($1) ESCAPE '\\')";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE {filter}"))
            .bind(&pattern)
            .fetch_one(self.pool())
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        let query = format!(
            "SELECT {CONTENT_COLUMNS} FROM {table} WHERE {filter} {ROOT_ORDER_BY}
             LIMIT $2 OFFSET $3"
        );
        let rows: Vec<ContentRow> = sqlx::query_as(&query)
            .bind(&pattern)
            .bind(pagination.per_page)
            .bind(pagination.offset())
            .fetch_all(self.pool())
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        Ok(PaginatedResult {
            items: rows_into_posts(rows),
            total,
            pagination,
        })
    }

    async fn fetch_item(&self, board_id: &BoardId, id: i64) -> Result<Option<ContentItem>> {
        let query = format!(
            "SELECT {CONTENT_COLUMNS} FROM {} WHERE wr_id = $1",
            board_id.write_table()
        );
        let row: Option<ContentRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;
        Ok(row.map(ContentItem::from))
    }

    async fn find_post(&self, board_id: &BoardId, id: i64) -> Result<Post> {
        self.fetch_item(board_id, id)
            .await?
            .and_then(ContentItem::into_post)
            .ok_or_else(|| GnubridgeError::NotFound(format!("post {id}")))
    }

    async fn find_comment(&self, board_id: &BoardId, id: i64) -> Result<Comment> {
        self.fetch_item(board_id, id)
            .await?
            .and_then(ContentItem::into_comment)
            .ok_or_else(|| GnubridgeError::NotFound(format!("comment {id}")))
    }

    /// Get a root post. Bumps its view count in the background.
    pub async fn get_post(&self, board_id: &BoardId, id: i64) -> Result<Post> {
        self.require_board(board_id).await?;
        let post = self.find_post(board_id, id).await?;
        self.spawn_hit(board_id, id);
        Ok(post)
    }

    /// Create a root post at the top of the board.
    pub async fn create_post(
        &self,
        board_id: &BoardId,
        new_post: &NewPost,
        author_id: &str,
    ) -> Result<Post> {
        self.require_board(board_id).await?;
        let table = board_id.write_table();
        let now = now_string();

        let mut tx = self.pool().begin().await?;
        lock_root_order(&mut tx, board_id).await?;

        let insert = format!(
            "INSERT INTO {table} (wr_num, wr_is_comment, ca_name, wr_option, wr_subject,
                wr_content, mb_id, wr_password, wr_name, wr_datetime, wr_last)
             VALUES ({}, 0, $1, $2, $3, $4, $5, $6, $7, $8, $8)
             RETURNING wr_id",
            next_root_num_expr(board_id)
        );
        let id: i64 = sqlx::query_scalar(&insert)
            .bind(&new_post.category)
            .bind(POST_OPTION)
            .bind(&new_post.title)
            .bind(&new_post.content)
            .bind(author_id)
            .bind(&new_post.password)
            .bind(&new_post.author)
            .bind(&now)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        sqlx::query(&format!("UPDATE {table} SET wr_parent = wr_id WHERE wr_id = $1"))
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        tx.commit().await?;
        debug!(board_id = %board_id, content_id = id, "post created");

        self.spawn_board_counter(board_id, BoardCounter::Write, 1);
        self.find_post(board_id, id).await
    }

    /// Overwrite the non-empty fields of `patch` on a root post.
    pub async fn update_post(
        &self,
        board_id: &BoardId,
        id: i64,
        actor_id: &str,
        patch: &PostPatch,
        admin_override: bool,
    ) -> Result<()> {
        self.require_board(board_id).await?;
        let post = self.find_post(board_id, id).await?;
        check_ownership(&post.author_id, actor_id, admin_override)?;
        self.apply_changes(board_id, id, patch.changes()).await
    }

    /// Delete a root post together with its comments.
    pub async fn delete_post(
        &self,
        board_id: &BoardId,
        id: i64,
        actor_id: &str,
        admin_override: bool,
    ) -> Result<()> {
        self.require_board(board_id).await?;
        let post = self.find_post(board_id, id).await?;
        check_ownership(&post.author_id, actor_id, admin_override)?;

        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE wr_parent = $1 OR wr_id = $1",
            board_id.write_table()
        ))
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        let removed_comments = result.rows_affected().saturating_sub(1) as i64;
        debug!(board_id = %board_id, content_id = id, removed_comments, "post deleted");

        self.spawn_board_counter(board_id, BoardCounter::Write, -1);
        if removed_comments > 0 {
            self.spawn_board_counter(board_id, BoardCounter::Comment, -removed_comments);
        }
        Ok(())
    }

    /// Comments under a post, oldest first.
    pub async fn list_comments(&self, board_id: &BoardId, post_id: i64) -> Result<Vec<Comment>> {
        self.require_board(board_id).await?;
        self.find_post(board_id, post_id).await?;

        let query = format!(
            "SELECT {CONTENT_COLUMNS} FROM {} WHERE wr_parent = $1 AND wr_is_comment = 1 {COMMENT_ORDER_BY}",
            board_id.write_table()
        );
        let rows: Vec<ContentRow> = sqlx::query_as(&query)
            .bind(post_id)
            .fetch_all(self.pool())
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|row| ContentItem::from(row).into_comment())
            .collect())
    }

    /// Get a single comment.
    pub async fn get_comment(&self, board_id: &BoardId, id: i64) -> Result<Comment> {
        self.require_board(board_id).await?;
        self.find_comment(board_id, id).await
    }

    /// Add a comment under a root post.
    pub async fn create_comment(
        &self,
        board_id: &BoardId,
        post_id: i64,
        new_comment: &NewComment,
        author_id: &str,
    ) -> Result<Comment> {
        self.require_board(board_id).await?;
        self.find_post(board_id, post_id).await?;
        let now = now_string();

        let insert = format!(
            "INSERT INTO {} (wr_num, wr_parent, wr_is_comment, wr_option, wr_content,
                mb_id, wr_name, wr_datetime, wr_last)
             VALUES ($1, $2, 1, '', $3, $4, $5, $6, $6)
             RETURNING wr_id",
            board_id.write_table()
        );
        let id: i64 = sqlx::query_scalar(&insert)
            .bind(COMMENT_NUM)
            .bind(post_id)
            .bind(&new_comment.content)
            .bind(author_id)
            .bind(&new_comment.author)
            .bind(&now)
            .fetch_one(self.pool())
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        debug!(board_id = %board_id, content_id = id, post_id, "comment created");

        self.spawn_board_counter(board_id, BoardCounter::Comment, 1);
        self.spawn_comment_count(board_id, post_id, 1);
        self.find_comment(board_id, id).await
    }

    /// Overwrite the comment body when the patch carries one.
    pub async fn update_comment(
        &self,
        board_id: &BoardId,
        id: i64,
        actor_id: &str,
        patch: &CommentPatch,
        admin_override: bool,
    ) -> Result<()> {
        self.require_board(board_id).await?;
        let comment = self.find_comment(board_id, id).await?;
        check_ownership(&comment.author_id, actor_id, admin_override)?;
        self.apply_changes(board_id, id, patch.changes()).await
    }

    /// Delete a single comment.
    pub async fn delete_comment(
        &self,
        board_id: &BoardId,
        id: i64,
        actor_id: &str,
        admin_override: bool,
    ) -> Result<()> {
        self.require_board(board_id).await?;
        let comment = self.find_comment(board_id, id).await?;
        check_ownership(&comment.author_id, actor_id, admin_override)?;

        sqlx::query(&format!(
            "DELETE FROM {} WHERE wr_id = $1 AND wr_is_comment = 1",
            board_id.write_table()
        ))
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        debug!(board_id = %board_id, content_id = id, "comment deleted");
        self.spawn_board_counter(board_id, BoardCounter::Comment, -1);
        self.spawn_comment_count(board_id, comment.parent_id, -1);
        Ok(())
    }

    /// Add one like to a root post. Returns the new count.
    pub async fn increment_like(&self, board_id: &BoardId, id: i64) -> Result<i64> {
        self.require_board(board_id).await?;
        let table = board_id.write_table();

        let result = sqlx::query(&format!(
            "UPDATE {table} SET wr_good = wr_good + 1 WHERE wr_id = $1 AND wr_is_comment = 0"
        ))
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(GnubridgeError::NotFound(format!("post {id}")));
        }
        Ok(self.find_post(board_id, id).await?.likes)
    }

    /// Remove one like from a root post, stopping at zero. Returns the new
    /// count.
    pub async fn decrement_like(&self, board_id: &BoardId, id: i64) -> Result<i64> {
        self.require_board(board_id).await?;
        let table = board_id.write_table();

        // The guard lives in the UPDATE itself so concurrent callers cannot
        // both pass a stale check.
        sqlx::query(&format!(
            "UPDATE {table} SET wr_good = wr_good - 1
             WHERE wr_id = $1 AND wr_is_comment = 0 AND wr_good > 0"
        ))
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        Ok(self.find_post(board_id, id).await?.likes)
    }

    async fn apply_changes(
        &self,
        board_id: &BoardId,
        id: i64,
        changes: Vec<(&'static str, &str)>,
    ) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut query: QueryBuilder<DbBackend> =
            QueryBuilder::new(format!("UPDATE {} SET ", board_id.write_table()));
        let mut separated = query.separated(", ");
        for (column, value) in changes {
            separated.push(format!("{column} = "));
            separated.push_bind_unseparated(value.to_string());
        }
        separated.push("wr_last = ");
        separated.push_bind_unseparated(now_string());
        query.push(" WHERE wr_id = ");
        query.push_bind(id);

        query
            .build()
            .execute(self.pool())
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;
        Ok(())
    }

    fn spawn_hit(&self, board_id: &BoardId, id: i64) {
        let pool = self.pool().clone();
        let board_id = board_id.clone();
        tokio::spawn(async move {
            let query = format!(
                "UPDATE {} SET wr_hit = wr_hit + 1 WHERE wr_id = $1",
                board_id.write_table()
            );
            if let Err(e) = sqlx::query(&query).bind(id).execute(&pool).await {
                warn!(board_id = %board_id, content_id = id, error = %e, "failed to record view");
            }
        });
    }

    fn spawn_board_counter(&self, board_id: &BoardId, counter: BoardCounter, delta: i64) {
        let pool = self.pool().clone();
        let board_id = board_id.clone();
        tokio::spawn(async move {
            let repo = BoardRepository::new(&pool);
            let result = if delta > 0 {
                repo.increment_counter(&board_id, counter).await
            } else {
                repo.decrement_counter(&board_id, counter, -delta).await
            };
            if let Err(e) = result {
                warn!(board_id = %board_id, ?counter, error = %e, "failed to adjust board counter");
            }
        });
    }

    fn spawn_comment_count(&self, board_id: &BoardId, post_id: i64, delta: i64) {
        let pool = self.pool().clone();
        let board_id = board_id.clone();
        tokio::spawn(async move {
            let table = board_id.write_table();
            let query = if delta > 0 {
                format!("UPDATE {table} SET wr_comment = wr_comment + 1 WHERE wr_id = $1")
            } else {
                format!(
                    "UPDATE {table} SET wr_comment = wr_comment - 1 WHERE wr_id = $1 AND wr_comment > 0"
                )
            };
            if let Err(e) = sqlx::query(&query).bind(post_id).execute(&pool).await {
                warn!(board_id = %board_id, content_id = post_id, error = %e, "failed to adjust comment count");
            }
        });
    }
}

fn rows_into_posts(rows: Vec<ContentRow>) -> Vec<Post> {
    rows.into_iter()
        .filter_map(|row| ContentItem::from(row).into_post())
        .collect()
}

/// `%keyword%` with LIKE wildcards in the keyword escaped.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::board::{BoardProvisioner, NewBoard};

    async fn setup() -> (Database, BoardId) {
        let db = Database::open_in_memory().await.unwrap();
        let id = BoardId::parse("free").unwrap();
        BoardProvisioner::new(&db)
            .create_board(&NewBoard::new(id.clone(), "community", "Free"), "admin")
            .await
            .unwrap();
        (db, id)
    }

    /// Poll until a background update makes `sql` return `expected`.
    async fn wait_for(db: &Database, sql: &str, expected: i64) {
        for _ in 0..100 {
            let value: i64 = sqlx::query_scalar(sql).fetch_one(db.pool()).await.unwrap();
            if value == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("background update never landed: {sql} != {expected}");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }

    #[tokio::test]
    async fn test_sequential_posts_get_decreasing_num() {
        let (db, board) = setup().await;
        let store = ContentStore::new(&db);

        for i in 1..=5 {
            let post = store
                .create_post(&board, &NewPost::new(format!("T{i}"), "C", "Alice"), "alice")
                .await
                .unwrap();
            assert_eq!(post.num, -i);
        }

        let page = store.list_posts(&board, Pagination::default()).await.unwrap();
        assert_eq!(page.total, 5);
        let nums: Vec<i64> = page.items.iter().map(|p| p.num).collect();
        assert_eq!(nums, vec![-5, -4, -3, -2, -1]);
        assert_eq!(page.items[0].title, "T5");
    }

    #[tokio::test]
    async fn test_created_post_fields() {
        let (db, board) = setup().await;
        let store = ContentStore::new(&db);

        let post = store
            .create_post(
                &board,
                &NewPost::new("Hello", "World", "Alice").with_category("news"),
                "alice",
            )
            .await
            .unwrap();

        assert_eq!(post.title, "Hello");
        assert_eq!(post.category, "news");
        assert_eq!(post.author, "Alice");
        assert_eq!(post.author_id, "alice");
        assert_eq!(post.created_at, post.last_updated);

        let (parent, option): (i64, String) =
            sqlx::query_as("SELECT wr_parent, wr_option FROM g5_write_free WHERE wr_id = $1")
                .bind(post.id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(parent, post.id);
        assert_eq!(option, "html1");
    }

    #[tokio::test]
    async fn test_list_paging() {
        let (db, board) = setup().await;
        let store = ContentStore::new(&db);
        for i in 0..3 {
            store
                .create_post(&board, &NewPost::new(format!("T{i}"), "C", "A"), "alice")
                .await
                .unwrap();
        }

        let page = store.list_posts(&board, Pagination::new(2, 2)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].num, -1);
    }

    #[tokio::test]
    async fn test_missing_board_is_not_found() {
        let db = Database::open_in_memory().await.unwrap();
        let store = ContentStore::new(&db);
        let ghost = BoardId::parse("ghost").unwrap();

        let result = store.list_posts(&ghost, Pagination::default()).await;
        assert!(matches!(result, Err(GnubridgeError::NotFound(_))));
        let result = store.get_post(&ghost, 1).await;
        assert!(matches!(result, Err(GnubridgeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_post_counts_view() {
        let (db, board) = setup().await;
        let store = ContentStore::new(&db);
        let post = store
            .create_post(&board, &NewPost::new("T", "C", "A"), "alice")
            .await
            .unwrap();

        let fetched = store.get_post(&board, post.id).await.unwrap();
        assert_eq!(fetched.views, 0);

        let sql = format!("SELECT wr_hit FROM g5_write_free WHERE wr_id = {}", post.id);
        wait_for(&db, &sql, 1).await;
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let (db, board) = setup().await;
        let result = ContentStore::new(&db).get_post(&board, 42).await;
        assert!(matches!(result, Err(GnubridgeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (db, board) = setup().await;
        let store = ContentStore::new(&db);
        store
            .create_post(&board, &NewPost::new("Rust tips", "ownership", "A"), "alice")
            .await
            .unwrap();
        store
            .create_post(&board, &NewPost::new("Go notes", "about RUST too", "A"), "alice")
            .await
            .unwrap();
        store
            .create_post(&board, &NewPost::new("Cooking", "pasta", "A"), "alice")
            .await
            .unwrap();

        let page = store
            .search_posts(&board, "rust", Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        let titles: Vec<&str> = page.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Go notes", "Rust tips"]);

        let none = store
            .search_posts(&board, "%", Pagination::default())
            .await
            .unwrap();
        assert_eq!(none.total, 0);
    }

    #[tokio::test]
    async fn test_update_post_ownership() {
        let (db, board) = setup().await;
        let store = ContentStore::new(&db);
        let post = store
            .create_post(&board, &NewPost::new("T", "C", "Alice"), "alice")
            .await
            .unwrap();

        let result = store
            .update_post(&board, post.id, "mallory", &PostPatch::default().title("X"), false)
            .await;
        assert!(matches!(result, Err(GnubridgeError::Unauthorized(_))));

        store
            .update_post(
                &board,
                post.id,
                "alice",
                &PostPatch {
                    title: Some("New".to_string()),
                    content: Some(String::new()),
                    category: None,
                },
                false,
            )
            .await
            .unwrap();

        let updated = store.find_post(&board, post.id).await.unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.content, "C");
    }

    #[tokio::test]
    async fn test_admin_override_on_update() {
        let (db, board) = setup().await;
        let store = ContentStore::new(&db);
        let post = store
            .create_post(&board, &NewPost::new("T", "C", "Alice"), "alice")
            .await
            .unwrap();

        store
            .update_post(&board, post.id, "admin", &PostPatch::default().content("mod"), true)
            .await
            .unwrap();
        assert_eq!(store.find_post(&board, post.id).await.unwrap().content, "mod");
    }

    #[tokio::test]
    async fn test_delete_post_ownership_and_cascade() {
        let (db, board) = setup().await;
        let store = ContentStore::new(&db);
        let post = store
            .create_post(&board, &NewPost::new("T", "C", "Alice"), "alice")
            .await
            .unwrap();
        let comment = store
            .create_comment(&board, post.id, &NewComment::new("hi", "Bob"), "bob")
            .await
            .unwrap();

        let result = store.delete_post(&board, post.id, "bob", false).await;
        assert!(matches!(result, Err(GnubridgeError::Unauthorized(_))));

        store.delete_post(&board, post.id, "alice", false).await.unwrap();

        assert!(matches!(
            store.get_post(&board, post.id).await,
            Err(GnubridgeError::NotFound(_))
        ));
        assert!(matches!(
            store.get_comment(&board, comment.id).await,
            Err(GnubridgeError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_comments_flow() {
        let (db, board) = setup().await;
        let store = ContentStore::new(&db);
        let post = store
            .create_post(&board, &NewPost::new("T", "C", "Alice"), "alice")
            .await
            .unwrap();

        let first = store
            .create_comment(&board, post.id, &NewComment::new("first", "Bob"), "bob")
            .await
            .unwrap();
        let second = store
            .create_comment(&board, post.id, &NewComment::new("second", "Carol"), "carol")
            .await
            .unwrap();

        assert_eq!(first.parent_id, post.id);
        let comments = store.list_comments(&board, post.id).await.unwrap();
        let ids: Vec<i64> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);

        // Comments stay out of the root listing.
        let page = store.list_posts(&board, Pagination::default()).await.unwrap();
        assert_eq!(page.total, 1);

        let result = store
            .update_comment(&board, first.id, "carol", &CommentPatch::default().content("x"), false)
            .await;
        assert!(matches!(result, Err(GnubridgeError::Unauthorized(_))));

        store
            .update_comment(&board, first.id, "bob", &CommentPatch::default().content("edited"), false)
            .await
            .unwrap();
        assert_eq!(store.get_comment(&board, first.id).await.unwrap().content, "edited");

        store.delete_comment(&board, second.id, "carol", false).await.unwrap();
        assert_eq!(store.list_comments(&board, post.id).await.unwrap().len(), 1);

        // A comment id is not a post id.
        assert!(matches!(
            store.get_post(&board, first.id).await,
            Err(GnubridgeError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let (db, board) = setup().await;
        let result = ContentStore::new(&db)
            .create_comment(&board, 99, &NewComment::new("hi", "Bob"), "bob")
            .await;
        assert!(matches!(result, Err(GnubridgeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_board_counters_follow_content() {
        let (db, board) = setup().await;
        let store = ContentStore::new(&db);
        let post = store
            .create_post(&board, &NewPost::new("T", "C", "Alice"), "alice")
            .await
            .unwrap();
        store
            .create_comment(&board, post.id, &NewComment::new("hi", "Bob"), "bob")
            .await
            .unwrap();

        wait_for(&db, "SELECT bo_count_write FROM g5_board WHERE bo_table = 'free'", 1).await;
        wait_for(&db, "SELECT bo_count_comment FROM g5_board WHERE bo_table = 'free'", 1).await;
        let sql = format!("SELECT wr_comment FROM g5_write_free WHERE wr_id = {}", post.id);
        wait_for(&db, &sql, 1).await;

        store.delete_post(&board, post.id, "alice", false).await.unwrap();
        wait_for(&db, "SELECT bo_count_write FROM g5_board WHERE bo_table = 'free'", 0).await;
        wait_for(&db, "SELECT bo_count_comment FROM g5_board WHERE bo_table = 'free'", 0).await;
    }

    #[tokio::test]
    async fn test_likes_never_go_negative() {
        let (db, board) = setup().await;
        let store = ContentStore::new(&db);
        let post = store
            .create_post(&board, &NewPost::new("T", "C", "Alice"), "alice")
            .await
            .unwrap();

        assert_eq!(store.increment_like(&board, post.id).await.unwrap(), 1);
        assert_eq!(store.decrement_like(&board, post.id).await.unwrap(), 0);
        assert_eq!(store.decrement_like(&board, post.id).await.unwrap(), 0);

        assert!(matches!(
            store.increment_like(&board, 404).await,
            Err(GnubridgeError::NotFound(_))
        ));
        assert!(matches!(
            store.decrement_like(&board, 404).await,
            Err(GnubridgeError::NotFound(_))
        ));
    }
}
