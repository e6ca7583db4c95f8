//! Thread ordering for root posts.
//!
//! Each new root post takes `MIN(wr_num) - 1` over its board, so the key
//! strictly decreases and lists sorted ascending show newest first. The key
//! is its own column, independent of `wr_id`, and stays freely editable.
//! `wr_reply` is carried through unchanged; nested reply codes are not
//! computed here.

use sqlx::Transaction;

use super::types::BoardId;
use crate::db::DbBackend;
use crate::{GnubridgeError, Result};

/// `wr_num` stored on every comment.
pub const COMMENT_NUM: i64 = 0;

/// Sort clause for root post listings.
pub(crate) const ROOT_ORDER_BY: &str = "ORDER BY wr_num ASC, wr_reply ASC";

/// Sort clause for comments under a post.
pub(crate) const COMMENT_ORDER_BY: &str = "ORDER BY wr_id ASC";

/// Scalar subquery yielding the next root key for a board.
///
/// Embedded in the INSERT itself, so the read and the write happen in one
/// statement inside the caller's transaction.
pub(crate) fn next_root_num_expr(board_id: &BoardId) -> String {
    format!(
        "(SELECT COALESCE(MIN(wr_num), 0) - 1 FROM {} WHERE wr_is_comment = 0)",
        board_id.write_table()
    )
}

/// Row lock taken before a root insert so concurrent inserts on one board
/// queue behind each other. SQLite admits one writer at a time already.
#[cfg(feature = "postgres")]
const ROOT_ORDER_LOCK: Option<&str> = Some("SELECT bo_table FROM g5_board WHERE bo_table = $1 FOR UPDATE");
#[cfg(feature = "sqlite")]
const ROOT_ORDER_LOCK: Option<&str> = None;

/// Serialize root-key allocation for `board_id` until `tx` ends.
pub(crate) async fn lock_root_order(
    tx: &mut Transaction<'_, DbBackend>,
    board_id: &BoardId,
) -> Result<()> {
    if let Some(statement) = ROOT_ORDER_LOCK {
        sqlx::query(statement)
            .bind(board_id.as_str())
            .execute(&mut **tx)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardProvisioner, NewBoard};
    use crate::db::{Database, DbPool};

    async fn peek_next_num(pool: &DbPool, board_id: &BoardId) -> i64 {
        sqlx::query_scalar(&format!("SELECT {}", next_root_num_expr(board_id)))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn test_next_root_num_expr() {
        let id = BoardId::parse("free").unwrap();
        assert_eq!(
            next_root_num_expr(&id),
            "(SELECT COALESCE(MIN(wr_num), 0) - 1 FROM g5_write_free WHERE wr_is_comment = 0)"
        );
    }

    #[tokio::test]
    async fn test_peek_on_empty_and_populated_board() {
        let db = Database::open_in_memory().await.unwrap();
        let id = BoardId::parse("free").unwrap();
        BoardProvisioner::new(&db)
            .create_board(&NewBoard::new(id.clone(), "g", "Free"), "admin")
            .await
            .unwrap();

        assert_eq!(peek_next_num(db.pool(), &id).await, -1);

        sqlx::query("INSERT INTO g5_write_free (wr_num, wr_is_comment) VALUES (-7, 0)")
            .execute(db.pool())
            .await
            .unwrap();
        // Comments never take part in the ordering.
        sqlx::query("INSERT INTO g5_write_free (wr_num, wr_is_comment) VALUES (-100, 1)")
            .execute(db.pool())
            .await
            .unwrap();

        assert_eq!(peek_next_num(db.pool(), &id).await, -8);
    }

    #[tokio::test]
    async fn test_lock_root_order_inside_insert_transaction() {
        let db = Database::open_in_memory().await.unwrap();
        let id = BoardId::parse("free").unwrap();
        BoardProvisioner::new(&db)
            .create_board(&NewBoard::new(id.clone(), "g", "Free"), "admin")
            .await
            .unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        lock_root_order(&mut tx, &id).await.unwrap();
        sqlx::query(&format!(
            "INSERT INTO g5_write_free (wr_num, wr_is_comment) VALUES ({}, 0)",
            next_root_num_expr(&id)
        ))
        .execute(&mut *tx)
        .await
        .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(peek_next_num(db.pool(), &id).await, -2);
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn test_root_order_lock_targets_board_row() {
        let statement = ROOT_ORDER_LOCK.unwrap();
        assert!(statement.contains("FROM g5_board"));
        assert!(statement.ends_with("FOR UPDATE"));
    }
}
