//! Startup model
//!
//! This module provides:
//! - `Startup` entity representing a tracked company
//! - Input types for creating and updating startups
//!
//! Startup names are indexed but not unique (two companies may share a
//! name); the slug is the unique handle used in URLs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum length for a startup name or slug
pub const STARTUP_FIELD_MAX: usize = 31;

/// Startup entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Startup {
    /// Unique identifier
    pub id: i64,
    /// Company name (indexed, not unique)
    pub name: String,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Free-form description
    pub description: String,
    /// Date the company was founded
    pub founded_date: NaiveDate,
    /// Contact email address
    pub contact: String,
    /// Company website URL
    pub website: String,
}

impl Startup {
    /// Create a new Startup. The ID will be assigned by the database.
    pub fn new(
        name: String,
        slug: String,
        description: String,
        founded_date: NaiveDate,
        contact: String,
        website: String,
    ) -> Self {
        Self {
            id: 0,
            name,
            slug,
            description,
            founded_date,
            contact,
            website,
        }
    }
}

impl std::fmt::Display for Startup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Input for creating a new startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStartupInput {
    /// Company name
    pub name: String,
    /// URL-friendly slug; derived from the name when omitted
    #[serde(default)]
    pub slug: Option<String>,
    /// Free-form description
    pub description: String,
    /// Date the company was founded
    pub founded_date: NaiveDate,
    /// Contact email address
    pub contact: String,
    /// Company website URL
    pub website: String,
}

/// Input for updating an existing startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStartupInput {
    /// New name (optional)
    pub name: Option<String>,
    /// New slug (optional)
    pub slug: Option<String>,
    /// New description (optional)
    pub description: Option<String>,
    /// New founded date (optional)
    pub founded_date: Option<NaiveDate>,
    /// New contact email (optional)
    pub contact: Option<String>,
    /// New website URL (optional)
    pub website: Option<String>,
}

impl UpdateStartupInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.slug.is_some()
            || self.description.is_some()
            || self.founded_date.is_some()
            || self.contact.is_some()
            || self.website.is_some()
    }
}
