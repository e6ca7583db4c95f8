//! Site navigation menus.
//!
//! Menus are flat `menus` rows linked by `parent_id`. They are read-only
//! here and assembled into trees per placement (sidebar or header).

mod repository;
mod service;
mod types;

pub use repository::MenuRepository;
pub use service::MenuService;
pub use types::{Menu, MenuList, MenuPlacement};
