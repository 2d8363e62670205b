//! News link model
//!
//! A news link is a press article about a startup. Links belong to exactly
//! one startup and are deleted with it. The slug only has to be unique
//! within the owning startup, so two startups may both use e.g. "funding".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Startup;

/// Maximum length for a news link name or slug
pub const NEWS_LINK_FIELD_MAX: usize = 31;

/// NewsLink entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsLink {
    /// Unique identifier
    pub id: i64,
    /// Article headline
    pub name: String,
    /// URL-friendly slug (unique per startup)
    pub slug: String,
    /// Date the article was published
    pub pub_date: NaiveDate,
    /// URL of the article
    pub link: String,
    /// Owning startup
    pub startup_id: i64,
}

impl NewsLink {
    /// Create a new NewsLink. The ID will be assigned by the database.
    pub fn new(
        name: String,
        slug: String,
        pub_date: NaiveDate,
        link: String,
        startup_id: i64,
    ) -> Self {
        Self {
            id: 0,
            name,
            slug,
            pub_date,
            link,
            startup_id,
        }
    }

    /// Human-readable label embedding the owning startup's name,
    /// e.g. `"JamBon Software: Series A announced"`.
    pub fn label(&self, startup: &Startup) -> String {
        format!("{}: {}", startup, self.name)
    }
}

/// Input for creating a new news link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNewsLinkInput {
    /// Article headline
    pub name: String,
    /// URL-friendly slug; derived from the name when omitted
    #[serde(default)]
    pub slug: Option<String>,
    /// Date the article was published
    pub pub_date: NaiveDate,
    /// URL of the article
    pub link: String,
}

/// Input for updating an existing news link
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNewsLinkInput {
    /// New headline (optional)
    pub name: Option<String>,
    /// New slug (optional)
    pub slug: Option<String>,
    /// New publication date (optional)
    pub pub_date: Option<NaiveDate>,
    /// New URL (optional)
    pub link: Option<String>,
}

impl UpdateNewsLinkInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.slug.is_some() || self.pub_date.is_some() || self.link.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_embeds_startup_name() {
        let startup = Startup::new(
            "JamBon Software".to_string(),
            "jambon-software".to_string(),
            String::new(),
            NaiveDate::from_ymd_opt(2013, 1, 18).unwrap(),
            "hello@jambonsw.com".to_string(),
            "https://jambonsw.com".to_string(),
        );
        let link = NewsLink::new(
            "Series A announced".to_string(),
            "series-a".to_string(),
            NaiveDate::from_ymd_opt(2017, 5, 2).unwrap(),
            "https://news.example.com/series-a".to_string(),
            startup.id,
        );
        assert_eq!(link.label(&startup), "JamBon Software: Series A announced");
    }

    #[test]
    fn test_update_input_has_changes() {
        assert!(!UpdateNewsLinkInput::default().has_changes());
        let input = UpdateNewsLinkInput {
            link: Some("https://example.com".to_string()),
            ..Default::default()
        };
        assert!(input.has_changes());
    }
}
