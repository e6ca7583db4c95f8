//! Database module for gnubridge.
//!
//! Connection pooling and migrations over sqlx. The backend is selected at
//! compile time with the `sqlite` (default) or `postgres` feature.

mod member;
mod schema;

pub use member::{Member, MemberRepository, NewMember};
pub use schema::MIGRATIONS;
pub(crate) use schema::serial_pk;

use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::{GnubridgeError, Result};

/// Pool type for the active backend.
#[cfg(feature = "sqlite")]
pub type DbPool = sqlx::SqlitePool;
/// Pool type for the active backend.
#[cfg(feature = "postgres")]
pub type DbPool = sqlx::PgPool;

/// Backend marker for `QueryBuilder`.
#[cfg(feature = "sqlite")]
pub type DbBackend = sqlx::Sqlite;
/// Backend marker for `QueryBuilder`.
#[cfg(feature = "postgres")]
pub type DbBackend = sqlx::Postgres;

/// Current time in the legacy `YYYY-MM-DD HH:MM:SS` text format.
pub fn now_string() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Database wrapper owning the connection pool.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Connect using the given configuration and apply pending migrations.
    #[cfg(feature = "sqlite")]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
        use std::str::FromStr;
        use std::time::Duration;

        info!("Opening database at {}", config.url);

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| GnubridgeError::DatabaseConnection(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| GnubridgeError::DatabaseConnection(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Connect using the given configuration and apply pending migrations.
    #[cfg(feature = "postgres")]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        use sqlx::postgres::PgPoolOptions;

        info!("Connecting to PostgreSQL");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| GnubridgeError::DatabaseConnection(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Open an in-memory database for testing.
    ///
    /// An in-memory SQLite database lives inside a single connection, so the
    /// pool is capped at one connection.
    #[cfg(feature = "sqlite")]
    pub async fn open_in_memory() -> Result<Self> {
        use sqlx::sqlite::SqlitePoolOptions;

        debug!("Opening in-memory database");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| GnubridgeError::DatabaseConnection(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Current schema version (0 if no migration has been applied).
    pub async fn schema_version(&self) -> Result<i64> {
        let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
            .fetch_one(&self.pool)
            .await?;
        Ok(version.unwrap_or(0))
    }

    /// Check whether a physical table exists.
    pub async fn table_exists(&self, name: &str) -> Result<bool> {
        table_exists(&self.pool, name).await
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql("CREATE TABLE IF NOT EXISTS schema_version (version BIGINT NOT NULL)")
            .execute(&self.pool)
            .await?;

        let current = self.schema_version().await?;
        let target = MIGRATIONS.len() as i64;
        if current >= target {
            debug!("Database schema is up to date (version {})", current);
            return Ok(());
        }

        for (index, migration) in MIGRATIONS.iter().enumerate().skip(current as usize) {
            let version = index as i64 + 1;
            info!("Applying migration v{}", version);

            let mut tx = self.pool.begin().await?;
            sqlx::raw_sql(migration).execute(&mut *tx).await?;
            sqlx::query("INSERT INTO schema_version (version) VALUES ($1)")
                .bind(version)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
        }

        Ok(())
    }
}

#[cfg(feature = "sqlite")]
const SQL_TABLE_EXISTS: &str =
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = $1";
#[cfg(feature = "postgres")]
const SQL_TABLE_EXISTS: &str = "SELECT COUNT(*) FROM information_schema.tables
     WHERE table_schema = current_schema() AND table_name = $1";

/// Check whether a physical table exists in the connected database.
pub async fn table_exists(pool: &DbPool, name: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(SQL_TABLE_EXISTS)
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// True when the error is a unique or primary key violation.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
