//! Menu repository for gnubridge.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::types::{Menu, MenuPlacement};
use crate::db::DbPool;
use crate::{GnubridgeError, Result};

const MENU_COLUMNS: &str = "id, parent_id, title, url, icon, shortcut, description, depth, \
     order_num, target, view_level, show_in_header, show_in_sidebar";

/// Read access to the `menus` table.
pub struct MenuRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> MenuRepository<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Active menus for `placement` visible at `level`, as trees.
    pub async fn list(&self, placement: MenuPlacement, level: i64) -> Result<Vec<Menu>> {
        let query = format!(
            "SELECT {MENU_COLUMNS} FROM menus
             WHERE is_active = TRUE AND {} = TRUE AND view_level <= $1
             ORDER BY depth ASC, order_num ASC, id ASC",
            placement.column()
        );
        let rows: Vec<MenuRow> = sqlx::query_as(&query)
            .bind(level)
            .fetch_all(self.pool)
            .await
            .map_err(|e| GnubridgeError::Database(e.to_string()))?;

        Ok(build_hierarchy(rows.into_iter().map(Menu::from).collect()))
    }
}

/// Nest `menus` under their parents, keeping input order among siblings.
///
/// Entries whose parent is not in `menus` are dropped along with their
/// subtrees, so a hidden parent hides everything below it.
pub(crate) fn build_hierarchy(menus: Vec<Menu>) -> Vec<Menu> {
    let present: HashSet<i64> = menus.iter().map(|m| m.id).collect();
    let mut roots = Vec::new();
    let mut children: HashMap<i64, Vec<Menu>> = HashMap::new();

    for menu in menus {
        match menu.parent_id {
            None => roots.push(menu),
            Some(parent) if present.contains(&parent) => {
                children.entry(parent).or_default().push(menu)
            }
            Some(parent) => debug!(menu_id = menu.id, parent_id = parent, "dropping orphaned menu"),
        }
    }

    for root in &mut roots {
        attach_children(root, &mut children);
    }
    roots
}

fn attach_children(menu: &mut Menu, children: &mut HashMap<i64, Vec<Menu>>) {
    // Removing the entry means a parent cycle can never be walked twice.
    if let Some(mut kids) = children.remove(&menu.id) {
        for kid in &mut kids {
            attach_children(kid, children);
        }
        menu.children = kids;
    }
}

#[derive(sqlx::FromRow)]
struct MenuRow {
    id: i64,
    parent_id: Option<i64>,
    title: String,
    url: String,
    icon: String,
    shortcut: String,
    description: String,
    depth: i64,
    order_num: i64,
    target: String,
    view_level: i64,
    show_in_header: bool,
    show_in_sidebar: bool,
}

impl From<MenuRow> for Menu {
    fn from(row: MenuRow) -> Self {
        Menu {
            id: row.id,
            parent_id: row.parent_id,
            title: row.title,
            url: row.url,
            icon: row.icon,
            shortcut: row.shortcut,
            description: row.description,
            depth: row.depth,
            order_num: row.order_num,
            target: row.target,
            view_level: row.view_level,
            show_in_header: row.show_in_header,
            show_in_sidebar: row.show_in_sidebar,
            children: Vec::new(),
        }
    }
}
