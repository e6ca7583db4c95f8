//! Board repository for gnubridge.
//!
//! Reads and updates `g5_board` rows. Creating and dropping boards goes
//! through [`BoardProvisioner`](super::BoardProvisioner) instead, because
//! the row and the content table must change together.

use sqlx::QueryBuilder;
use tracing::warn;

use super::types::{Board, BoardId, BoardUpdate, Pagination};
use crate::db::{DbBackend, DbPool};
use crate::{GnubridgeError, Result};

pub(crate) const BOARD_COLUMNS: &str = "bo_table, gr_id, bo_subject, bo_admin, bo_device, \
     bo_list_level, bo_read_level, bo_write_level, bo_reply_level, bo_comment_level, \
     bo_use_category, bo_category_list, bo_skin, bo_mobile_skin, bo_page_rows, \
     bo_upload_count, bo_upload_size, bo_notice, bo_order, bo_count_write, bo_count_comment, \
     bo_insert_time";

/// Running counters kept on the board row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCounter {
    /// `bo_count_write`: root posts.
    Write,
    /// `bo_count_comment`: comments.
    Comment,
}

impl BoardCounter {
    fn column(&self) -> &'static str {
        match self {
            BoardCounter::Write => "bo_count_write",
            BoardCounter::Comment => "bo_count_comment",
        }
    }
}

/// Repository for board configuration rows.
pub struct BoardRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> BoardRepository<'a> {
    /// Create a new BoardRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Get a board by id.
    pub async fn get(&self, board_id: &BoardId) -> Result<Option<Board>> {
        let query = format!("SELECT {} FROM g5_board WHERE bo_table = $1", BOARD_COLUMNS);
        let row: Option<BoardRow> = sqlx::query_as(&query)
            .bind(board_id.as_str())
            .fetch_optional(self.pool)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        row.map(BoardRow::into_board).transpose()
    }

    /// Check whether a board row exists.
    pub async fn exists(&self, board_id: &BoardId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM g5_board WHERE bo_table = $1")
            .bind(board_id.as_str())
            .fetch_one(self.pool)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// List boards ordered by `bo_order`, then id. Legacy rows whose id
    /// [`BoardId::parse`] would reject are neither listed nor counted.
    pub async fn list(&self, pagination: Pagination) -> Result<(Vec<Board>, i64)> {
        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM g5_board WHERE {USABLE_BOARD_ID}"))
                .fetch_one(self.pool)
                .await
                .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        let query = format!(
            "SELECT {BOARD_COLUMNS} FROM g5_board WHERE {USABLE_BOARD_ID}
             ORDER BY bo_order ASC, bo_table ASC LIMIT $1 OFFSET $2"
        );
        let rows: Vec<BoardRow> = sqlx::query_as(&query)
            .bind(pagination.per_page)
            .bind(pagination.offset())
            .fetch_all(self.pool)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        Ok((rows_into_boards(rows), total))
    }

    /// List all boards of a group.
    pub async fn list_by_group(&self, group_id: &str) -> Result<Vec<Board>> {
        let query = format!(
            "SELECT {} FROM g5_board WHERE gr_id = $1 ORDER BY bo_order ASC, bo_table ASC",
            BOARD_COLUMNS
        );
        let rows: Vec<BoardRow> = sqlx::query_as(&query)
            .bind(group_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        Ok(rows_into_boards(rows))
    }

    /// Update a board row.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated board, or None if not found.
    pub async fn update(&self, board_id: &BoardId, update: &BoardUpdate) -> Result<Option<Board>> {
        if update.is_empty() {
            return self.get(board_id).await;
        }

        let mut query: QueryBuilder<DbBackend> = QueryBuilder::new("UPDATE g5_board SET ");
        let mut separated = query.separated(", ");

        let text_fields = [
            ("bo_subject = ", &update.subject),
            ("bo_admin = ", &update.admin),
            ("bo_device = ", &update.device),
            ("bo_category_list = ", &update.category_list),
            ("bo_skin = ", &update.skin),
            ("bo_mobile_skin = ", &update.mobile_skin),
        ];
        for (column, value) in text_fields {
            if let Some(value) = value {
                separated.push(column);
                separated.push_bind_unseparated(value.clone());
            }
        }

        let int_fields = [
            ("bo_list_level = ", update.list_level),
            ("bo_read_level = ", update.read_level),
            ("bo_write_level = ", update.write_level),
            ("bo_reply_level = ", update.reply_level),
            ("bo_comment_level = ", update.comment_level),
            ("bo_use_category = ", update.use_category),
            ("bo_page_rows = ", update.page_rows),
            ("bo_upload_count = ", update.upload_count),
            ("bo_upload_size = ", update.upload_size),
        ];
        for (column, value) in int_fields {
            if let Some(value) = value {
                separated.push(column);
                separated.push_bind_unseparated(value);
            }
        }

        query.push(" WHERE bo_table = ");
        query.push_bind(board_id.as_str().to_string());

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(board_id).await
    }

    /// Add one to a counter.
    pub async fn increment_counter(&self, board_id: &BoardId, counter: BoardCounter) -> Result<()> {
        let column = counter.column();
        let query = format!(
            "UPDATE g5_board SET {column} = {column} + 1 WHERE bo_table = $1"
        );
        sqlx::query(&query)
            .bind(board_id.as_str())
            .execute(self.pool)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;
        Ok(())
    }

    /// Subtract up to `by` from a counter, never going below zero.
    pub async fn decrement_counter(
        &self,
        board_id: &BoardId,
        counter: BoardCounter,
        by: i64,
    ) -> Result<()> {
        let column = counter.column();
        let query = format!(
            "UPDATE g5_board SET {column} = CASE WHEN {column} > $1 THEN {column} - $1 ELSE 0 END
             WHERE bo_table = $2"
        );
        sqlx::query(&query)
            .bind(by)
            .bind(board_id.as_str())
            .execute(self.pool)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Predicate selecting rows with a 2-20 character ASCII alphanumeric `bo_table`.
#[cfg(feature = "sqlite")]
const USABLE_BOARD_ID: &str =
    "length(bo_table) BETWEEN 2 AND 20 AND bo_table NOT GLOB '*[^A-Za-z0-9]*'";
#[cfg(feature = "postgres")]
const USABLE_BOARD_ID: &str = "bo_table ~ '^[A-Za-z0-9]{2,20}$'";

fn rows_into_boards(rows: Vec<BoardRow>) -> Vec<Board> {
    rows.into_iter()
        .filter_map(|row| {
            let bo_table = row.bo_table.clone();
            match row.into_board() {
                Ok(board) => Some(board),
                Err(e) => {
                    warn!(bo_table = %bo_table, error = %e, "skipping board with unusable id");
                    None
                }
            }
        })
        .collect()
}

/// Internal struct for mapping database rows to Board.
#[derive(sqlx::FromRow)]
struct BoardRow {
    bo_table: String,
    gr_id: String,
    bo_subject: String,
    bo_admin: String,
    bo_device: String,
    bo_list_level: i64,
    bo_read_level: i64,
    bo_write_level: i64,
    bo_reply_level: i64,
    bo_comment_level: i64,
    bo_use_category: i64,
    bo_category_list: String,
    bo_skin: String,
    bo_mobile_skin: String,
    bo_page_rows: i64,
    bo_upload_count: i64,
    bo_upload_size: i64,
    bo_notice: String,
    bo_order: i64,
    bo_count_write: i64,
    bo_count_comment: i64,
    bo_insert_time: String,
}

impl BoardRow {
    fn into_board(self) -> Result<Board> {
        Ok(Board {
            board_id: BoardId::parse(&self.bo_table)?,
            group_id: self.gr_id,
            subject: self.bo_subject,
            admin: self.bo_admin,
            device: self.bo_device,
            list_level: self.bo_list_level,
            read_level: self.bo_read_level,
            write_level: self.bo_write_level,
            reply_level: self.bo_reply_level,
            comment_level: self.bo_comment_level,
            use_category: self.bo_use_category,
            category_list: self.bo_category_list,
            skin: self.bo_skin,
            mobile_skin: self.bo_mobile_skin,
            page_rows: self.bo_page_rows,
            upload_count: self.bo_upload_count,
            upload_size: self.bo_upload_size,
            notice: self.bo_notice,
            order: self.bo_order,
            count_write: self.bo_count_write,
            count_comment: self.bo_count_comment,
            insert_time: self.bo_insert_time,
        })
    }
}
