//! Menu service for gnubridge.

use super::repository::MenuRepository;
use super::types::{Menu, MenuList, MenuPlacement};
use crate::auth::Identity;
use crate::db::Database;
use crate::Result;

/// Navigation menus as seen by one caller.
pub struct MenuService<'a> {
    db: &'a Database,
}

impl<'a> MenuService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Sidebar and header trees together.
    pub async fn menus(&self, identity: &Identity) -> Result<MenuList> {
        Ok(MenuList {
            sidebar: self.sidebar(identity).await?,
            header: self.header(identity).await?,
        })
    }

    pub async fn sidebar(&self, identity: &Identity) -> Result<Vec<Menu>> {
        self.placed(MenuPlacement::Sidebar, identity).await
    }

    pub async fn header(&self, identity: &Identity) -> Result<Vec<Menu>> {
        self.placed(MenuPlacement::Header, identity).await
    }

    async fn placed(&self, placement: MenuPlacement, identity: &Identity) -> Result<Vec<Menu>> {
        MenuRepository::new(self.db.pool())
            .list(placement, identity.effective_level())
            .await
    }
}
