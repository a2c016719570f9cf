//! Category entity type - hierarchical product classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::EntityId;
use crate::core::tree::CategoryRecord;

/// A product category. Categories form a tree through `parent`; a category
/// without a parent is top-level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: EntityId,

    /// Display name
    pub name: String,

    /// URL-safe slug derived from the name
    pub slug: String,

    /// Parent category; `None` marks a top-level category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,

    /// Detailed description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Inactive categories are hidden from the tree and explorer
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Explicit ordering among siblings; categories without one sort last
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this category)
    pub author: String,
}

fn default_active() -> bool {
    true
}

impl Entity for Category {
    const PREFIX: &'static str = "CAT";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl Category {
    /// Create a new category with a derived slug
    pub fn new(name: String, parent: Option<EntityId>, author: String) -> Self {
        let slug = slugify(&name);
        Self {
            id: EntityId::new(crate::core::EntityPrefix::Cat),
            name,
            slug,
            parent,
            description: None,
            is_active: true,
            display_order: None,
            notes: None,
            created: Utc::now(),
            author,
        }
    }

    /// Flat record for tree construction
    pub fn to_record(&self) -> CategoryRecord {
        CategoryRecord {
            id: self.id.to_string(),
            name: self.name.clone(),
            parent_id: self.parent.as_ref().map(|p| p.to_string()),
            display_order: self.display_order,
        }
    }
}

/// Derive a slug from a name: lowercase, whitespace runs become `-`, and
/// anything outside word characters and `-` is stripped.
pub fn slugify(name: &str) -> String {
    let joined = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
