//! Tag model
//!
//! Tags label startups and blog posts for cross-referencing. Both the name
//! and the slug are unique across the whole site.

use serde::{Deserialize, Serialize};

/// Maximum length for a tag name or slug
pub const TAG_FIELD_MAX: usize = 31;

/// Tag entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Tag name (unique)
    pub name: String,
    /// URL-friendly slug (unique)
    pub slug: String,
}

impl Tag {
    /// Create a new Tag. The ID will be assigned by the database.
    pub fn new(name: String, slug: String) -> Self {
        Self { id: 0, name, slug }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Input for creating a new tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTagInput {
    /// Tag name
    pub name: String,
    /// URL-friendly slug; derived from the name when omitted
    #[serde(default)]
    pub slug: Option<String>,
}

/// Input for updating an existing tag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTagInput {
    /// New name (optional)
    pub name: Option<String>,
    /// New slug (optional)
    pub slug: Option<String>,
}

impl UpdateTagInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.slug.is_some()
    }
}
