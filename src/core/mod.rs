//! Core module - fundamental types and utilities

pub mod config;
pub mod entity;
pub mod explorer;
pub mod identity;
pub mod loader;
pub mod project;
pub mod shortid;
pub mod tree;

pub use config::Config;
pub use entity::Entity;
pub use explorer::{Categorized, Explorer, Listing};
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use project::{Project, ProjectError};
pub use shortid::ShortIdIndex;
pub use tree::{CategoryRecord, CategoryTree, TreeNode};
