//! Board module for gnubridge.
//!
//! This module provides the Gnuboard-compatible board model:
//! - Board configuration rows and their capability thresholds
//! - Atomic provisioning of a board's physical content table
//! - Posts and comments stored in that table, with thread ordering
//! - A gated service layer composing all of the above

mod content;
mod content_store;
pub mod ordering;
mod provisioner;
mod repository;
mod service;
mod types;

pub use content::{
    Comment, CommentPatch, ContentItem, NewComment, NewPost, Post, PostPatch,
};
pub use content_store::ContentStore;
pub use provisioner::BoardProvisioner;
pub use repository::{BoardCounter, BoardRepository};
pub use service::BoardService;
pub use types::{
    Board, BoardId, BoardUpdate, Capability, NewBoard, PaginatedResult, Pagination,
    BOARD_ID_MAX_LEN, BOARD_ID_MIN_LEN, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
