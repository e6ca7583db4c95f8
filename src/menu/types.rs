use serde::Serialize;

/// Where a menu is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPlacement {
    Sidebar,
    Header,
}

impl MenuPlacement {
    /// Flag column selecting rows for this placement.
    pub(crate) fn column(&self) -> &'static str {
        match self {
            MenuPlacement::Sidebar => "show_in_sidebar",
            MenuPlacement::Header => "show_in_header",
        }
    }
}

/// One navigation entry with its visible children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub shortcut: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub depth: i64,
    pub order_num: i64,
    pub target: String,
    /// Minimum member level that sees this entry.
    #[serde(skip)]
    pub view_level: i64,
    pub show_in_header: bool,
    pub show_in_sidebar: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Menu>,
}

/// Both menu trees, as served by `GET /api/v2/menus`.
#[derive(Debug, Clone, Serialize)]
pub struct MenuList {
    pub sidebar: Vec<Menu>,
    pub header: Vec<Menu>,
}
