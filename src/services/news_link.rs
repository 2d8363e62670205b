//! News link service
//!
//! Business logic for news links. Every operation resolves the owning
//! startup first, so a link can only ever be addressed through its parent,
//! and the slug pre-check runs inside that startup's scope.

use anyhow::Context;
use std::sync::Arc;

use crate::db::repositories::{NewsLinkRepository, StartupRepository};
use crate::models::news_link::NEWS_LINK_FIELD_MAX;
use crate::models::{CreateNewsLinkInput, NewsLink, Startup, UpdateNewsLinkInput};
use crate::services::validate;

/// Error types for news link service operations
#[derive(Debug, thiserror::Error)]
pub enum NewsLinkServiceError {
    /// Owning startup not found
    #[error("Startup not found: {0}")]
    StartupNotFound(String),

    /// News link not found
    #[error("News link not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate slug within the startup
    #[error("News link slug already exists for this startup: {0}")]
    DuplicateSlug(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// News link service
pub struct NewsLinkService {
    repo: Arc<dyn NewsLinkRepository>,
    startup_repo: Arc<dyn StartupRepository>,
}

impl NewsLinkService {
    /// Create a new news link service
    pub fn new(repo: Arc<dyn NewsLinkRepository>, startup_repo: Arc<dyn StartupRepository>) -> Self {
        Self { repo, startup_repo }
    }

    /// Create a news link under the startup identified by `startup_slug`.
    pub async fn create(
        &self,
        startup_slug: &str,
        input: CreateNewsLinkInput,
    ) -> Result<NewsLink, NewsLinkServiceError> {
        let startup = self.resolve_startup(startup_slug).await?;

        let name = input.name.trim().to_string();
        validate::require_text("name", &name, NEWS_LINK_FIELD_MAX)
            .map_err(NewsLinkServiceError::Validation)?;
        validate::require_url("link", &input.link).map_err(NewsLinkServiceError::Validation)?;

        let slug = match input.slug {
            Some(slug) => {
                validate::require_slug("slug", &slug, NEWS_LINK_FIELD_MAX)
                    .map_err(NewsLinkServiceError::Validation)?;
                slug
            }
            None => validate::derive_slug(&name, NEWS_LINK_FIELD_MAX)
                .map_err(NewsLinkServiceError::Validation)?,
        };

        if self
            .repo
            .get_by_slug(startup.id, &slug)
            .await
            .context("Failed to check news link slug")?
            .is_some()
        {
            return Err(NewsLinkServiceError::DuplicateSlug(slug));
        }

        let link = NewsLink::new(name, slug, input.pub_date, input.link, startup.id);
        let created = self
            .repo
            .create(&link)
            .await
            .context("Failed to create news link")?;
        Ok(created)
    }

    /// Get a news link by slug within a startup
    pub async fn get(
        &self,
        startup_slug: &str,
        slug: &str,
    ) -> Result<(Startup, NewsLink), NewsLinkServiceError> {
        let startup = self.resolve_startup(startup_slug).await?;
        let link = self
            .repo
            .get_by_slug(startup.id, slug)
            .await
            .context("Failed to get news link")?
            .ok_or_else(|| NewsLinkServiceError::NotFound(slug.to_string()))?;
        Ok((startup, link))
    }

    /// List a startup's news links, newest first
    pub async fn list(&self, startup_slug: &str) -> Result<Vec<NewsLink>, NewsLinkServiceError> {
        let startup = self.resolve_startup(startup_slug).await?;
        Ok(self
            .repo
            .list_for_startup(startup.id)
            .await
            .context("Failed to list news links")?)
    }

    /// Update a news link identified by `(startup_slug, slug)`.
    pub async fn update(
        &self,
        startup_slug: &str,
        slug: &str,
        input: UpdateNewsLinkInput,
    ) -> Result<NewsLink, NewsLinkServiceError> {
        if !input.has_changes() {
            return Err(NewsLinkServiceError::Validation(
                "No fields to update".to_string(),
            ));
        }

        let (startup, mut link) = self.get(startup_slug, slug).await?;

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            validate::require_text("name", &name, NEWS_LINK_FIELD_MAX)
                .map_err(NewsLinkServiceError::Validation)?;
            link.name = name;
        }
        if let Some(new_slug) = input.slug {
            validate::require_slug("slug", &new_slug, NEWS_LINK_FIELD_MAX)
                .map_err(NewsLinkServiceError::Validation)?;
            if new_slug != link.slug {
                if self
                    .repo
                    .get_by_slug(startup.id, &new_slug)
                    .await
                    .context("Failed to check news link slug")?
                    .is_some()
                {
                    return Err(NewsLinkServiceError::DuplicateSlug(new_slug));
                }
                link.slug = new_slug;
            }
        }
        if let Some(pub_date) = input.pub_date {
            link.pub_date = pub_date;
        }
        if let Some(url) = input.link {
            validate::require_url("link", &url).map_err(NewsLinkServiceError::Validation)?;
            link.link = url;
        }

        self.repo
            .update(&link)
            .await
            .context("Failed to update news link")?;
        Ok(link)
    }

    /// Delete a news link identified by `(startup_slug, slug)`.
    pub async fn delete(&self, startup_slug: &str, slug: &str) -> Result<(), NewsLinkServiceError> {
        let (_, link) = self.get(startup_slug, slug).await?;
        self.repo
            .delete(link.id)
            .await
            .context("Failed to delete news link")?;
        Ok(())
    }

    async fn resolve_startup(&self, slug: &str) -> Result<Startup, NewsLinkServiceError> {
        self.startup_repo
            .get_by_slug(slug)
            .await
            .context("Failed to get startup")?
            .ok_or_else(|| NewsLinkServiceError::StartupNotFound(slug.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxNewsLinkRepository, SqlxStartupRepository};
    use crate::db::{create_test_pool, migrations};
    use chrono::NaiveDate;

    async fn setup_service() -> NewsLinkService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let startup_repo = SqlxStartupRepository::boxed(pool.clone());

        // Seed two startups to scope links under
        for slug in ["jambon", "acme"] {
            startup_repo
                .create(&Startup::new(
                    format!("Startup {}", slug),
                    slug.to_string(),
                    "desc".to_string(),
                    NaiveDate::from_ymd_opt(2014, 1, 1).unwrap(),
                    "hello@example.com".to_string(),
                    "https://example.com".to_string(),
                ))
                .await
                .expect("Failed to seed startup");
        }

        NewsLinkService::new(SqlxNewsLinkRepository::boxed(pool), startup_repo)
    }

    fn input(name: &str, slug: Option<&str>) -> CreateNewsLinkInput {
        CreateNewsLinkInput {
            name: name.to_string(),
            slug: slug.map(String::from),
            pub_date: NaiveDate::from_ymd_opt(2017, 5, 2).unwrap(),
            link: "https://news.example.com/article".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_under_missing_startup() {
        let service = setup_service().await;

        let result = service.create("missing", input("Funding", None)).await;
        assert!(matches!(result, Err(NewsLinkServiceError::StartupNotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_slug_same_startup_is_conflict() {
        let service = setup_service().await;
        service
            .create("jambon", input("Funding", Some("funding")))
            .await
            .expect("Failed to create news link");

        let result = service
            .create("jambon", input("More Funding", Some("funding")))
            .await;
        assert!(matches!(result, Err(NewsLinkServiceError::DuplicateSlug(_))));
    }

    #[tokio::test]
    async fn test_same_slug_different_startup_is_fine() {
        let service = setup_service().await;
        service
            .create("jambon", input("Funding", Some("funding")))
            .await
            .expect("Failed to create news link");

        service
            .create("acme", input("Funding", Some("funding")))
            .await
            .expect("Same slug under a different startup should succeed");
    }

    #[tokio::test]
    async fn test_create_rejects_unsluggable_name() {
        let service = setup_service().await;

        let result = service.create("jambon", input("!!!", None)).await;
        assert!(matches!(result, Err(NewsLinkServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_link() {
        let service = setup_service().await;

        let mut bad = input("Funding", None);
        bad.link = "not-a-url".to_string();
        let result = service.create("jambon", bad).await;
        assert!(matches!(result, Err(NewsLinkServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let service = setup_service().await;
        service
            .create("jambon", input("Launch", Some("launch")))
            .await
            .expect("Failed to create news link");

        let updated = service
            .update(
                "jambon",
                "launch",
                UpdateNewsLinkInput {
                    link: Some("https://press.example.com/launch".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to update news link");
        assert_eq!(updated.link, "https://press.example.com/launch");

        service
            .delete("jambon", "launch")
            .await
            .expect("Failed to delete news link");
        let result = service.get("jambon", "launch").await;
        assert!(matches!(result, Err(NewsLinkServiceError::NotFound(_))));
    }
}
