//! Member rows (`g5_member`) shared with the legacy site.

use serde::Serialize;

use super::{now_string, DbPool};
use crate::{GnubridgeError, Result};

/// Member entity as stored in `g5_member`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Member {
    #[serde(rename = "id")]
    pub mb_no: i64,
    #[serde(rename = "user_id")]
    pub mb_id: String,
    /// Legacy hash in one of the three supported formats. Never serialized.
    #[serde(skip)]
    pub mb_password: String,
    #[serde(rename = "name")]
    pub mb_name: String,
    #[serde(rename = "nickname")]
    pub mb_nick: String,
    #[serde(rename = "email")]
    pub mb_email: String,
    #[serde(rename = "level")]
    pub mb_level: i64,
    #[serde(rename = "point")]
    pub mb_point: i64,
    #[serde(skip)]
    pub mb_today_login: String,
    #[serde(rename = "created_at")]
    pub mb_datetime: String,
}

/// New member for creation.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub mb_id: String,
    pub mb_password: String,
    pub mb_name: String,
    pub mb_nick: String,
    pub mb_email: String,
    pub mb_level: i64,
}

impl NewMember {
    /// Create a new member with level 2 (ordinary member).
    pub fn new(
        mb_id: impl Into<String>,
        mb_password: impl Into<String>,
        mb_nick: impl Into<String>,
    ) -> Self {
        let mb_nick = mb_nick.into();
        Self {
            mb_id: mb_id.into(),
            mb_password: mb_password.into(),
            mb_name: mb_nick.clone(),
            mb_nick,
            mb_email: String::new(),
            mb_level: 2,
        }
    }

    /// Set the member level.
    pub fn with_level(mut self, level: i64) -> Self {
        self.mb_level = level;
        self
    }

    /// Set the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.mb_email = email.into();
        self
    }
}

const MEMBER_COLUMNS: &str = "mb_no, mb_id, mb_password, mb_name, mb_nick, mb_email,
     mb_level, mb_point, mb_today_login, mb_datetime";

/// Repository for member lookups.
pub struct MemberRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> MemberRepository<'a> {
    /// Create a new MemberRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a member and return the stored row.
    pub async fn create(&self, new_member: &NewMember) -> Result<Member> {
        let now = now_string();
        let result = sqlx::query(
            "INSERT INTO g5_member (mb_id, mb_password, mb_name, mb_nick, mb_email, mb_level, mb_datetime)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&new_member.mb_id)
        .bind(&new_member.mb_password)
        .bind(&new_member.mb_name)
        .bind(&new_member.mb_nick)
        .bind(&new_member.mb_email)
        .bind(new_member.mb_level)
        .bind(&now)
        .execute(self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(e) if super::is_unique_violation(&e) => {
                return Err(GnubridgeError::Duplicate(format!(
                    "member '{}'",
                    new_member.mb_id
                )));
            }
            Err(e) => return Err(GnubridgeError::Database(e.to_string())),
        }

        self.get_by_mb_id(&new_member.mb_id)
            .await?
            .ok_or_else(|| GnubridgeError::NotFound("member".to_string()))
    }

    /// Get a member by login id.
    pub async fn get_by_mb_id(&self, mb_id: &str) -> Result<Option<Member>> {
        let query = format!("SELECT {} FROM g5_member WHERE mb_id = $1", MEMBER_COLUMNS);
        let member = sqlx::query_as::<_, Member>(&query)
            .bind(mb_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;
        Ok(member)
    }

    /// Record a login timestamp.
    pub async fn update_login_time(&self, mb_id: &str, at: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE g5_member SET mb_today_login = $1 WHERE mb_id = $2")
            .bind(at)
            .bind(mb_id)
            .execute(self.pool)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}
