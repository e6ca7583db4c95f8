//! Content items stored in a board's `g5_write_*` table.
//!
//! Root posts and comments share one physical row shape. At this boundary a
//! row becomes either a [`Post`] or a [`Comment`].

use serde::Serialize;

/// Every column of the legacy content table, selected in this order.
pub(crate) const CONTENT_COLUMNS: &str = "wr_id, wr_num, wr_reply, wr_parent, wr_is_comment, \
     wr_comment, wr_comment_reply, ca_name, wr_option, wr_subject, wr_content, wr_seo_title, \
     wr_link1, wr_link2, wr_link1_hit, wr_link2_hit, wr_hit, wr_good, wr_nogood, mb_id, \
     wr_password, wr_name, wr_email, wr_homepage, wr_datetime, wr_file, wr_last, wr_ip, \
     wr_facebook_user, wr_twitter_user, wr_1, wr_2, wr_3, wr_4, wr_5, wr_6, wr_7, wr_8, wr_9, \
     wr_10";

/// Raw content row.
#[derive(Debug, Clone, sqlx::FromRow)]
#[allow(dead_code)]
pub(crate) struct ContentRow {
    pub wr_id: i64,
    pub wr_num: i64,
    pub wr_reply: String,
    pub wr_parent: i64,
    pub wr_is_comment: i64,
    pub wr_comment: i64,
    pub wr_comment_reply: String,
    pub ca_name: String,
    pub wr_option: String,
    pub wr_subject: String,
    pub wr_content: String,
    pub wr_seo_title: String,
    pub wr_link1: String,
    pub wr_link2: String,
    pub wr_link1_hit: i64,
    pub wr_link2_hit: i64,
    pub wr_hit: i64,
    pub wr_good: i64,
    pub wr_nogood: i64,
    pub mb_id: String,
    pub wr_password: String,
    pub wr_name: String,
    pub wr_email: String,
    pub wr_homepage: String,
    pub wr_datetime: String,
    pub wr_file: i64,
    pub wr_last: String,
    pub wr_ip: String,
    pub wr_facebook_user: String,
    pub wr_twitter_user: String,
    pub wr_1: String,
    pub wr_2: String,
    pub wr_3: String,
    pub wr_4: String,
    pub wr_5: String,
    pub wr_6: String,
    pub wr_7: String,
    pub wr_8: String,
    pub wr_9: String,
    pub wr_10: String,
}

/// A root post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: i64,
    /// Ordering key; smaller sorts first.
    pub num: i64,
    #[serde(skip)]
    pub reply: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    pub author: String,
    pub author_id: String,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub comments_count: i64,
    pub has_file: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link1: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link2: String,
    pub seo_title: String,
    pub created_at: String,
    pub last_updated: String,
}

/// A flat comment under a root post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: i64,
    /// Id of the owning post.
    pub parent_id: i64,
    pub content: String,
    pub author: String,
    pub author_id: String,
    /// Read from `wr_comment` as-is.
    pub depth: i64,
    pub created_at: String,
}

/// One content row, typed by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    Post(Post),
    Comment(Comment),
}

impl ContentItem {
    pub fn into_post(self) -> Option<Post> {
        match self {
            ContentItem::Post(p) => Some(p),
            ContentItem::Comment(_) => None,
        }
    }

    pub fn into_comment(self) -> Option<Comment> {
        match self {
            ContentItem::Comment(c) => Some(c),
            ContentItem::Post(_) => None,
        }
    }
}

impl From<ContentRow> for ContentItem {
    fn from(row: ContentRow) -> Self {
        if row.wr_is_comment != 0 {
            ContentItem::Comment(Comment {
                id: row.wr_id,
                parent_id: row.wr_parent,
                content: row.wr_content,
                author: row.wr_name,
                author_id: row.mb_id,
                depth: row.wr_comment,
                created_at: row.wr_datetime,
            })
        } else {
            ContentItem::Post(Post {
                id: row.wr_id,
                num: row.wr_num,
                reply: row.wr_reply,
                title: row.wr_subject,
                content: row.wr_content,
                category: row.ca_name,
                author: row.wr_name,
                author_id: row.mb_id,
                views: row.wr_hit,
                likes: row.wr_good,
                dislikes: row.wr_nogood,
                comments_count: row.wr_comment,
                has_file: row.wr_file > 0,
                link1: row.wr_link1,
                link2: row.wr_link2,
                seo_title: row.wr_seo_title,
                created_at: row.wr_datetime,
                last_updated: row.wr_last,
            })
        }
    }
}

/// Data for a new root post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: String,
    /// Display name stored in `wr_name`.
    pub author: String,
    pub password: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: author.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// Data for a new comment.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub content: String,
    pub author: String,
}

impl NewComment {
    pub fn new(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: author.into(),
        }
    }
}

/// Partial post update. Empty strings count as "no change".
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl PostPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Column/value pairs that actually change.
    pub(crate) fn changes(&self) -> Vec<(&'static str, &str)> {
        [
            ("wr_subject", &self.title),
            ("wr_content", &self.content),
            ("ca_name", &self.category),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (column, v))
        })
        .collect()
    }
}

/// Partial comment update.
#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub content: Option<String>,
}

impl CommentPatch {
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub(crate) fn changes(&self) -> Vec<(&'static str, &str)> {
        self.content
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| vec![("wr_content", v)])
            .unwrap_or_default()
    }
}
