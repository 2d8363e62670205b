//! Startup service
//!
//! Business logic for startup management: field validation (email, URL,
//! lengths), slug derivation, the slug uniqueness pre-check, and tag
//! association upkeep.

use anyhow::Context;
use std::sync::Arc;

use crate::db::repositories::{StartupRepository, TagRepository};
use crate::models::startup::STARTUP_FIELD_MAX;
use crate::models::{CreateStartupInput, ListParams, PagedResult, Startup, Tag, UpdateStartupInput};
use crate::services::validate;

/// Error types for startup service operations
#[derive(Debug, thiserror::Error)]
pub enum StartupServiceError {
    /// Startup not found
    #[error("Startup not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate slug
    #[error("Startup slug already exists: {0}")]
    DuplicateSlug(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Startup service
pub struct StartupService {
    repo: Arc<dyn StartupRepository>,
    tag_repo: Arc<dyn TagRepository>,
}

impl StartupService {
    /// Create a new startup service
    pub fn new(repo: Arc<dyn StartupRepository>, tag_repo: Arc<dyn TagRepository>) -> Self {
        Self { repo, tag_repo }
    }

    /// Create a new startup, optionally associating tags.
    pub async fn create(
        &self,
        input: CreateStartupInput,
        tag_ids: Option<Vec<i64>>,
    ) -> Result<Startup, StartupServiceError> {
        let name = input.name.trim().to_string();
        validate::require_text("name", &name, STARTUP_FIELD_MAX)
            .map_err(StartupServiceError::Validation)?;
        validate::require_email("contact", &input.contact)
            .map_err(StartupServiceError::Validation)?;
        validate::require_url("website", &input.website)
            .map_err(StartupServiceError::Validation)?;

        let slug = match input.slug {
            Some(slug) => {
                validate::require_slug("slug", &slug, STARTUP_FIELD_MAX)
                    .map_err(StartupServiceError::Validation)?;
                slug
            }
            None => validate::derive_slug(&name, STARTUP_FIELD_MAX)
                .map_err(StartupServiceError::Validation)?,
        };

        if self
            .repo
            .get_by_slug(&slug)
            .await
            .context("Failed to check startup slug")?
            .is_some()
        {
            return Err(StartupServiceError::DuplicateSlug(slug));
        }

        if let Some(ids) = &tag_ids {
            self.check_tags_exist(ids).await?;
        }

        let startup = Startup::new(
            name,
            slug,
            input.description,
            input.founded_date,
            input.contact,
            input.website,
        );
        let created = self
            .repo
            .create(&startup)
            .await
            .context("Failed to create startup")?;

        if let Some(ids) = tag_ids {
            self.repo
                .set_tags(created.id, &ids)
                .await
                .context("Failed to associate tags")?;
        }

        Ok(created)
    }

    /// Get startup by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Startup, StartupServiceError> {
        self.repo
            .get_by_slug(slug)
            .await
            .context("Failed to get startup")?
            .ok_or_else(|| StartupServiceError::NotFound(slug.to_string()))
    }

    /// List startups page by page, alphabetically by name
    pub async fn list_paged(
        &self,
        params: &ListParams,
    ) -> Result<PagedResult<Startup>, StartupServiceError> {
        Ok(self
            .repo
            .list_paged(params)
            .await
            .context("Failed to list startups")?)
    }

    /// The most recently founded startup
    pub async fn latest(&self) -> Result<Startup, StartupServiceError> {
        self.repo
            .latest()
            .await
            .context("Failed to get latest startup")?
            .ok_or_else(|| StartupServiceError::NotFound("latest".to_string()))
    }

    /// Tags associated with a startup
    pub async fn tags_for(&self, startup_id: i64) -> Result<Vec<Tag>, StartupServiceError> {
        Ok(self
            .repo
            .tags_for(startup_id)
            .await
            .context("Failed to get startup tags")?)
    }

    /// Update the startup identified by `slug`, optionally replacing its tags.
    pub async fn update(
        &self,
        slug: &str,
        input: UpdateStartupInput,
        tag_ids: Option<Vec<i64>>,
    ) -> Result<Startup, StartupServiceError> {
        if !input.has_changes() && tag_ids.is_none() {
            return Err(StartupServiceError::Validation(
                "No fields to update".to_string(),
            ));
        }

        let mut startup = self.get_by_slug(slug).await?;

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            validate::require_text("name", &name, STARTUP_FIELD_MAX)
                .map_err(StartupServiceError::Validation)?;
            startup.name = name;
        }
        if let Some(new_slug) = input.slug {
            validate::require_slug("slug", &new_slug, STARTUP_FIELD_MAX)
                .map_err(StartupServiceError::Validation)?;
            if new_slug != startup.slug {
                if self
                    .repo
                    .get_by_slug(&new_slug)
                    .await
                    .context("Failed to check startup slug")?
                    .is_some()
                {
                    return Err(StartupServiceError::DuplicateSlug(new_slug));
                }
                startup.slug = new_slug;
            }
        }
        if let Some(description) = input.description {
            startup.description = description;
        }
        if let Some(founded_date) = input.founded_date {
            startup.founded_date = founded_date;
        }
        if let Some(contact) = input.contact {
            validate::require_email("contact", &contact)
                .map_err(StartupServiceError::Validation)?;
            startup.contact = contact;
        }
        if let Some(website) = input.website {
            validate::require_url("website", &website).map_err(StartupServiceError::Validation)?;
            startup.website = website;
        }

        self.repo
            .update(&startup)
            .await
            .context("Failed to update startup")?;

        if let Some(ids) = tag_ids {
            self.check_tags_exist(&ids).await?;
            self.repo
                .set_tags(startup.id, &ids)
                .await
                .context("Failed to associate tags")?;
        }

        Ok(startup)
    }

    /// Delete the startup identified by `slug`; its news links go with it.
    pub async fn delete(&self, slug: &str) -> Result<(), StartupServiceError> {
        let startup = self.get_by_slug(slug).await?;
        self.repo
            .delete(startup.id)
            .await
            .context("Failed to delete startup")?;
        Ok(())
    }

    async fn check_tags_exist(&self, tag_ids: &[i64]) -> Result<(), StartupServiceError> {
        for id in tag_ids {
            if self
                .tag_repo
                .get_by_id(*id)
                .await
                .context("Failed to check tag")?
                .is_none()
            {
                return Err(StartupServiceError::Validation(format!(
                    "Unknown tag id: {}",
                    id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxStartupRepository, SqlxTagRepository};
    use crate::db::{create_test_pool, migrations};
    use chrono::NaiveDate;

    async fn setup_service() -> (StartupService, TagServiceHandle) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let tag_repo = SqlxTagRepository::boxed(pool.clone());
        let service = StartupService::new(SqlxStartupRepository::boxed(pool), tag_repo.clone());
        (service, TagServiceHandle { repo: tag_repo })
    }

    struct TagServiceHandle {
        repo: Arc<dyn TagRepository>,
    }

    impl TagServiceHandle {
        async fn create_tag(&self, name: &str, slug: &str) -> i64 {
            self.repo
                .create(&crate::models::Tag::new(name.to_string(), slug.to_string()))
                .await
                .expect("Failed to create tag")
                .id
        }
    }

    fn input(name: &str, slug: Option<&str>) -> CreateStartupInput {
        CreateStartupInput {
            name: name.to_string(),
            slug: slug.map(String::from),
            description: "A test company.".to_string(),
            founded_date: NaiveDate::from_ymd_opt(2013, 1, 18).unwrap(),
            contact: "hello@example.com".to_string(),
            website: "https://example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_derives_slug() {
        let (service, _tags) = setup_service().await;

        let startup = service
            .create(input("JamBon Software", None), None)
            .await
            .expect("Failed to create startup");
        assert_eq!(startup.slug, "jambon-software");
    }

    #[tokio::test]
    async fn test_create_rejects_unsluggable_name() {
        let (service, _tags) = setup_service().await;

        let result = service.create(input("???", None), None).await;
        assert!(matches!(result, Err(StartupServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_email() {
        let (service, _tags) = setup_service().await;

        let mut bad = input("Acme", None);
        bad.contact = "not-an-email".to_string();
        let result = service.create(bad, None).await;
        assert!(matches!(result, Err(StartupServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_website() {
        let (service, _tags) = setup_service().await;

        let mut bad = input("Acme", None);
        bad.website = "gopher://example.com".to_string();
        let result = service.create(bad, None).await;
        assert!(matches!(result, Err(StartupServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let (service, _tags) = setup_service().await;
        service
            .create(input("Acme", Some("acme")), None)
            .await
            .expect("Failed to create startup");

        let result = service.create(input("Acme Again", Some("acme")), None).await;
        assert!(matches!(result, Err(StartupServiceError::DuplicateSlug(_))));
    }

    #[tokio::test]
    async fn test_create_with_tags() {
        let (service, tags) = setup_service().await;
        let web = tags.create_tag("web", "web").await;
        let mobile = tags.create_tag("mobile", "mobile").await;

        let startup = service
            .create(input("Tagged", None), Some(vec![web, mobile]))
            .await
            .expect("Failed to create startup");

        let attached = service
            .tags_for(startup.id)
            .await
            .expect("Failed to get tags");
        assert_eq!(attached.len(), 2);
    }

    #[tokio::test]
    async fn test_create_with_unknown_tag_is_rejected() {
        let (service, _tags) = setup_service().await;

        let result = service.create(input("Acme", None), Some(vec![9999])).await;
        assert!(matches!(result, Err(StartupServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_contact_validation() {
        let (service, _tags) = setup_service().await;
        service
            .create(input("Acme", Some("acme")), None)
            .await
            .expect("Failed to create startup");

        let result = service
            .update(
                "acme",
                UpdateStartupInput {
                    contact: Some("broken".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await;
        assert!(matches!(result, Err(StartupServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (service, _tags) = setup_service().await;

        let result = service.delete("missing").await;
        assert!(matches!(result, Err(StartupServiceError::NotFound(_))));
    }
}
