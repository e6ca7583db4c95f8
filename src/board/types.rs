//! Board model for gnubridge.
//!
//! A board is a row in `g5_board` plus its own physical content table
//! `g5_write_{bo_table}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{GnubridgeError, Result};

/// Minimum board id length.
pub const BOARD_ID_MIN_LEN: usize = 2;
/// Maximum board id length.
pub const BOARD_ID_MAX_LEN: usize = 20;

/// Prefix of every per-board content table.
const WRITE_TABLE_PREFIX: &str = "g5_write_";

/// Validated board identifier: 2 to 20 ASCII letters or digits.
///
/// This is the only value ever interpolated into SQL identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BoardId(String);

impl BoardId {
    /// Validate and wrap a board id.
    pub fn parse(s: &str) -> Result<Self> {
        let len = s.len();
        let valid = (BOARD_ID_MIN_LEN..=BOARD_ID_MAX_LEN).contains(&len)
            && s.bytes().all(|b| b.is_ascii_alphanumeric());
        if !valid {
            return Err(GnubridgeError::InvalidInput(format!(
                "invalid board_id '{s}': must be {BOARD_ID_MIN_LEN}-{BOARD_ID_MAX_LEN} alphanumeric characters"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Board id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the board's physical content table.
    pub fn write_table(&self) -> String {
        format!("{}{}", WRITE_TABLE_PREFIX, self.0)
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BoardId {
    type Err = GnubridgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for BoardId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for BoardId {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Actions gated by a per-board level threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    List,
    Read,
    Write,
    Reply,
    Comment,
}

impl Capability {
    /// Lowercase name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::List => "list",
            Capability::Read => "read",
            Capability::Write => "write",
            Capability::Reply => "reply",
            Capability::Comment => "comment",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Board configuration row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub board_id: BoardId,
    pub group_id: String,
    pub subject: String,
    /// Member id of the board's own administrator.
    pub admin: String,
    pub device: String,
    pub list_level: i64,
    pub read_level: i64,
    pub write_level: i64,
    pub reply_level: i64,
    pub comment_level: i64,
    pub use_category: i64,
    pub category_list: String,
    pub skin: String,
    pub mobile_skin: String,
    pub page_rows: i64,
    pub upload_count: i64,
    pub upload_size: i64,
    pub notice: String,
    pub order: i64,
    pub count_write: i64,
    pub count_comment: i64,
    pub insert_time: String,
}

impl Board {
    /// Level threshold configured for a capability.
    pub fn level_for(&self, capability: Capability) -> i64 {
        match capability {
            Capability::List => self.list_level,
            Capability::Read => self.read_level,
            Capability::Write => self.write_level,
            Capability::Reply => self.reply_level,
            Capability::Comment => self.comment_level,
        }
    }
}

/// Data for creating a new board. Unset options take the legacy defaults.
#[derive(Debug, Clone)]
pub struct NewBoard {
    pub board_id: BoardId,
    pub group_id: String,
    pub subject: String,
    pub device: Option<String>,
    pub list_level: Option<i64>,
    pub read_level: Option<i64>,
    pub write_level: Option<i64>,
    pub reply_level: Option<i64>,
    pub comment_level: Option<i64>,
    pub use_category: Option<i64>,
    pub category_list: String,
    pub skin: Option<String>,
    pub mobile_skin: Option<String>,
    pub page_rows: Option<i64>,
    pub upload_count: Option<i64>,
    pub upload_size: Option<i64>,
}

impl NewBoard {
    /// Create a new board with minimal required fields.
    pub fn new(board_id: BoardId, group_id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            board_id,
            group_id: group_id.into(),
            subject: subject.into(),
            device: None,
            list_level: None,
            read_level: None,
            write_level: None,
            reply_level: None,
            comment_level: None,
            use_category: None,
            category_list: String::new(),
            skin: None,
            mobile_skin: None,
            page_rows: None,
            upload_count: None,
            upload_size: None,
        }
    }

    /// Set the write threshold.
    pub fn with_write_level(mut self, level: i64) -> Self {
        self.write_level = Some(level);
        self
    }

    /// Set the read threshold.
    pub fn with_read_level(mut self, level: i64) -> Self {
        self.read_level = Some(level);
        self
    }

    /// Set the list threshold.
    pub fn with_list_level(mut self, level: i64) -> Self {
        self.list_level = Some(level);
        self
    }

    /// Set the comment threshold.
    pub fn with_comment_level(mut self, level: i64) -> Self {
        self.comment_level = Some(level);
        self
    }
}

/// Data for updating an existing board. Only `Some` fields change.
#[derive(Debug, Clone, Default)]
pub struct BoardUpdate {
    pub subject: Option<String>,
    pub admin: Option<String>,
    pub device: Option<String>,
    pub list_level: Option<i64>,
    pub read_level: Option<i64>,
    pub write_level: Option<i64>,
    pub reply_level: Option<i64>,
    pub comment_level: Option<i64>,
    pub use_category: Option<i64>,
    pub category_list: Option<String>,
    pub skin: Option<String>,
    pub mobile_skin: Option<String>,
    pub page_rows: Option<i64>,
    pub upload_count: Option<i64>,
    pub upload_size: Option<i64>,
}

impl BoardUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new subject.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set new write threshold.
    pub fn write_level(mut self, level: i64) -> Self {
        self.write_level = Some(level);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.admin.is_none()
            && self.device.is_none()
            && self.list_level.is_none()
            && self.read_level.is_none()
            && self.write_level.is_none()
            && self.reply_level.is_none()
            && self.comment_level.is_none()
            && self.use_category.is_none()
            && self.category_list.is_none()
            && self.skin.is_none()
            && self.mobile_skin.is_none()
            && self.page_rows.is_none()
            && self.upload_count.is_none()
            && self.upload_size.is_none()
    }
}

/// Default page size.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination parameters, coerced into range on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
}

impl Pagination {
    /// Page below 1 becomes 1; a size outside 1..=100 becomes 20.
    pub fn new(page: i64, per_page: i64) -> Self {
        let page = page.max(1);
        let per_page = if (1..=MAX_PAGE_SIZE).contains(&per_page) {
            per_page
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self { page, per_page }
    }

    /// Number of items to skip. Saturates for absurdly large pages.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// Result of a paginated query.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: i64,
    /// Pagination used for this query.
    pub pagination: Pagination,
}
