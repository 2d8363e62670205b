//! Blog post model
//!
//! This module provides:
//! - `Post` entity representing a blog post
//! - Input types for creating and updating posts
//!
//! A post's slug is unique within the calendar month of its publication
//! date, so "year-in-review" can recur every December. Posts cross-reference
//! the organizer domain through tag and startup associations.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length for a post title or slug
pub const POST_FIELD_MAX: usize = 63;

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Post title
    pub title: String,
    /// URL-friendly slug (unique within the month of pub_date)
    pub slug: String,
    /// Post body
    pub text: String,
    /// Date published
    pub pub_date: NaiveDate,
}

impl Post {
    /// Create a new Post. The ID will be assigned by the database.
    /// When `pub_date` is `None`, the post is dated today.
    pub fn new(title: String, slug: String, text: String, pub_date: Option<NaiveDate>) -> Self {
        Self {
            id: 0,
            title,
            slug,
            text,
            pub_date: pub_date.unwrap_or_else(|| Utc::now().date_naive()),
        }
    }

    /// The `YYYY-MM` month key the slug uniqueness is scoped to
    pub fn month_key(&self) -> String {
        self.pub_date.format("%Y-%m").to_string()
    }
}

impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on {}", self.title, self.pub_date.format("%Y-%m-%d"))
    }
}

/// Input for creating a new post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostInput {
    /// Post title
    pub title: String,
    /// URL-friendly slug; derived from the title when omitted
    #[serde(default)]
    pub slug: Option<String>,
    /// Post body
    pub text: String,
    /// Date published; defaults to today when omitted
    #[serde(default)]
    pub pub_date: Option<NaiveDate>,
}

/// Input for updating an existing post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostInput {
    /// New title (optional)
    pub title: Option<String>,
    /// New slug (optional)
    pub slug: Option<String>,
    /// New body (optional)
    pub text: Option<String>,
    /// New publication date (optional)
    pub pub_date: Option<NaiveDate>,
}

impl UpdatePostInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.title.is_some() || self.slug.is_some() || self.text.is_some() || self.pub_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_defaults_pub_date_to_today() {
        let post = Post::new(
            "Hello".to_string(),
            "hello".to_string(),
            "Body".to_string(),
            None,
        );
        assert_eq!(post.pub_date, Utc::now().date_naive());
    }

    #[test]
    fn test_post_display_includes_date() {
        let post = Post::new(
            "Django Training".to_string(),
            "django-training".to_string(),
            "Body".to_string(),
            NaiveDate::from_ymd_opt(2013, 1, 18),
        );
        assert_eq!(post.to_string(), "Django Training on 2013-01-18");
    }

    #[test]
    fn test_month_key() {
        let post = Post::new(
            "Hello".to_string(),
            "hello".to_string(),
            "Body".to_string(),
            NaiveDate::from_ymd_opt(2017, 2, 3),
        );
        assert_eq!(post.month_key(), "2017-02");
    }
}
