//! Atomic creation and removal of boards.
//!
//! A board is its `g5_board` row plus its `g5_write_{id}` table. Both are
//! created or dropped inside one transaction, so neither is ever visible
//! without the other.

use tracing::{info, warn};

use super::repository::BoardRepository;
use super::types::{Board, BoardId, NewBoard};
use crate::db::{is_unique_violation, now_string, serial_pk, Database};
use crate::{GnubridgeError, Result};

const SERIAL_PK: &str = serial_pk!();

pub(crate) const DEFAULT_DEVICE: &str = "both";
pub(crate) const DEFAULT_SKIN: &str = "basic";
pub(crate) const DEFAULT_LEVEL: i64 = 1;
pub(crate) const DEFAULT_PAGE_ROWS: i64 = 15;
pub(crate) const DEFAULT_UPLOAD_COUNT: i64 = 2;
pub(crate) const DEFAULT_UPLOAD_SIZE: i64 = 1_048_576;

/// DDL for a board's content table. Every text column is NOT NULL with an
/// empty-string default, matching what the legacy site writes.
fn write_table_ddl(board_id: &BoardId) -> [String; 3] {
    let table = board_id.write_table();
    let create = format!(
        "CREATE TABLE {table} (
            wr_id             {SERIAL_PK},
            wr_num            BIGINT NOT NULL DEFAULT 0,
            wr_reply          TEXT NOT NULL DEFAULT '',
            wr_parent         BIGINT NOT NULL DEFAULT 0,
            wr_is_comment     BIGINT NOT NULL DEFAULT 0,
            wr_comment        BIGINT NOT NULL DEFAULT 0,
            wr_comment_reply  TEXT NOT NULL DEFAULT '',
            ca_name           TEXT NOT NULL DEFAULT '',
            wr_option         TEXT NOT NULL DEFAULT '',
            wr_subject        TEXT NOT NULL DEFAULT '',
            wr_content        TEXT NOT NULL DEFAULT '',
            wr_seo_title      TEXT NOT NULL DEFAULT '',
            wr_link1          TEXT NOT NULL DEFAULT '',
            wr_link2          TEXT NOT NULL DEFAULT '',
            wr_link1_hit      BIGINT NOT NULL DEFAULT 0,
            wr_link2_hit      BIGINT NOT NULL DEFAULT 0,
            wr_hit            BIGINT NOT NULL DEFAULT 0,
            wr_good           BIGINT NOT NULL DEFAULT 0,
            wr_nogood         BIGINT NOT NULL DEFAULT 0,
            mb_id             TEXT NOT NULL DEFAULT '',
            wr_password       TEXT NOT NULL DEFAULT '',
            wr_name           TEXT NOT NULL DEFAULT '',
            wr_email          TEXT NOT NULL DEFAULT '',
            wr_homepage       TEXT NOT NULL DEFAULT '',
            wr_datetime       TEXT NOT NULL DEFAULT '',
            wr_file           BIGINT NOT NULL DEFAULT 0,
            wr_last           TEXT NOT NULL DEFAULT '',
            wr_ip             TEXT NOT NULL DEFAULT '',
            wr_facebook_user  TEXT NOT NULL DEFAULT '',
            wr_twitter_user   TEXT NOT NULL DEFAULT '',
            wr_1              TEXT NOT NULL DEFAULT '',
            wr_2              TEXT NOT NULL DEFAULT '',
            wr_3              TEXT NOT NULL DEFAULT '',
            wr_4              TEXT NOT NULL DEFAULT '',
            wr_5              TEXT NOT NULL DEFAULT '',
            wr_6              TEXT NOT NULL DEFAULT '',
            wr_7              TEXT NOT NULL DEFAULT '',
            wr_8              TEXT NOT NULL DEFAULT '',
            wr_9              TEXT NOT NULL DEFAULT '',
            wr_10             TEXT NOT NULL DEFAULT ''
        )"
    );
    let num_index =
        format!("CREATE INDEX idx_{table}_num_reply ON {table} (wr_num, wr_reply, wr_parent)");
    let comment_index =
        format!("CREATE INDEX idx_{table}_is_comment ON {table} (wr_is_comment, wr_id)");
    [create, num_index, comment_index]
}

/// Creates and removes boards.
pub struct BoardProvisioner<'a> {
    db: &'a Database,
}

impl<'a> BoardProvisioner<'a> {
    /// Create a new BoardProvisioner.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Check whether a board exists.
    pub async fn exists(&self, board_id: &BoardId) -> Result<bool> {
        BoardRepository::new(self.db.pool()).exists(board_id).await
    }

    /// Create a board row and its content table in one transaction.
    ///
    /// `creator_id` becomes the board's own administrator. Concurrent
    /// creators of the same id are serialized by the primary key: exactly
    /// one succeeds, the rest get `Duplicate`.
    pub async fn create_board(&self, new_board: &NewBoard, creator_id: &str) -> Result<Board> {
        let board_id = &new_board.board_id;
        if self.exists(board_id).await? {
            return Err(duplicate(board_id));
        }

        let mut tx = self.db.pool().begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO g5_board (bo_table, gr_id, bo_subject, bo_admin, bo_device,
                bo_list_level, bo_read_level, bo_write_level, bo_reply_level, bo_comment_level,
                bo_use_category, bo_category_list, bo_skin, bo_mobile_skin, bo_page_rows,
                bo_upload_count, bo_upload_size, bo_insert_time)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)",
        )
        .bind(board_id.as_str())
        .bind(&new_board.group_id)
        .bind(&new_board.subject)
        .bind(creator_id)
        .bind(new_board.device.as_deref().unwrap_or(DEFAULT_DEVICE))
        .bind(new_board.list_level.unwrap_or(DEFAULT_LEVEL))
        .bind(new_board.read_level.unwrap_or(DEFAULT_LEVEL))
        .bind(new_board.write_level.unwrap_or(DEFAULT_LEVEL))
        .bind(new_board.reply_level.unwrap_or(DEFAULT_LEVEL))
        .bind(new_board.comment_level.unwrap_or(DEFAULT_LEVEL))
        .bind(new_board.use_category.unwrap_or(0))
        .bind(&new_board.category_list)
        .bind(new_board.skin.as_deref().unwrap_or(DEFAULT_SKIN))
        .bind(new_board.mobile_skin.as_deref().unwrap_or(DEFAULT_SKIN))
        .bind(new_board.page_rows.unwrap_or(DEFAULT_PAGE_ROWS))
        .bind(new_board.upload_count.unwrap_or(DEFAULT_UPLOAD_COUNT))
        .bind(new_board.upload_size.unwrap_or(DEFAULT_UPLOAD_SIZE))
        .bind(now_string())
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(duplicate(board_id)),
            Err(e) => return Err(GnubridgeError::Database(e.to_string())),
        }

        for statement in write_table_ddl(board_id) {
            if let Err(e) = sqlx::query(&statement).execute(&mut *tx).await {
                warn!(board_id = %board_id, error = %e, "content table creation failed, rolling back");
                return Err(GnubridgeError::Database(e.to_string()));
            }
        }

        tx.commit().await?;
        info!(board_id = %board_id, creator = %creator_id, "board created");

        BoardRepository::new(self.db.pool())
            .get(board_id)
            .await?
            .ok_or_else(|| GnubridgeError::NotFound(format!("board '{board_id}'")))
    }

    /// Drop a board's content table and remove its row and auxiliary index
    /// rows, all in one transaction.
    pub async fn delete_board(&self, board_id: &BoardId) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        let deleted = sqlx::query("DELETE FROM g5_board WHERE bo_table = $1")
            .bind(board_id.as_str())
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(GnubridgeError::NotFound(format!("board '{board_id}'")));
        }

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", board_id.write_table()))
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM g5_board_file WHERE bo_table = $1")
            .bind(board_id.as_str())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM g5_board_new WHERE bo_table = $1")
            .bind(board_id.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(board_id = %board_id, "board deleted");
        Ok(())
    }
}

fn duplicate(board_id: &BoardId) -> GnubridgeError {
    GnubridgeError::Duplicate(format!("board '{board_id}'"))
}
