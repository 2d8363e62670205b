//! Tag service
//!
//! Business logic for tag management: validation, slug derivation, and the
//! name/slug uniqueness pre-checks.

use anyhow::Context;
use std::sync::Arc;

use crate::db::repositories::TagRepository;
use crate::models::tag::TAG_FIELD_MAX;
use crate::models::{CreateTagInput, Tag, UpdateTagInput};
use crate::services::validate;

/// Error types for tag service operations
#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    /// Tag not found
    #[error("Tag not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate name or slug
    #[error("Tag already exists: {0}")]
    Duplicate(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Tag service
pub struct TagService {
    repo: Arc<dyn TagRepository>,
}

impl TagService {
    /// Create a new tag service
    pub fn new(repo: Arc<dyn TagRepository>) -> Self {
        Self { repo }
    }

    /// Create a new tag.
    ///
    /// The slug is derived from the name when the input omits it. Both the
    /// name and the slug must be unused.
    pub async fn create(&self, input: CreateTagInput) -> Result<Tag, TagServiceError> {
        let name = input.name.trim().to_string();
        validate::require_text("name", &name, TAG_FIELD_MAX).map_err(TagServiceError::Validation)?;

        let slug = match input.slug {
            Some(slug) => {
                validate::require_slug("slug", &slug, TAG_FIELD_MAX)
                    .map_err(TagServiceError::Validation)?;
                slug
            }
            None => validate::derive_slug(&name, TAG_FIELD_MAX)
                .map_err(TagServiceError::Validation)?,
        };

        if self
            .repo
            .get_by_name(&name)
            .await
            .context("Failed to check tag name")?
            .is_some()
        {
            return Err(TagServiceError::Duplicate(name));
        }
        if self
            .repo
            .get_by_slug(&slug)
            .await
            .context("Failed to check tag slug")?
            .is_some()
        {
            return Err(TagServiceError::Duplicate(slug));
        }

        let created = self
            .repo
            .create(&Tag::new(name, slug))
            .await
            .context("Failed to create tag")?;
        Ok(created)
    }

    /// Get tag by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Tag, TagServiceError> {
        self.repo
            .get_by_slug(slug)
            .await
            .context("Failed to get tag")?
            .ok_or_else(|| TagServiceError::NotFound(slug.to_string()))
    }

    /// List all tags, alphabetically by name
    pub async fn list(&self) -> Result<Vec<Tag>, TagServiceError> {
        Ok(self.repo.list().await.context("Failed to list tags")?)
    }

    /// Update the tag identified by `slug`
    pub async fn update(&self, slug: &str, input: UpdateTagInput) -> Result<Tag, TagServiceError> {
        if !input.has_changes() {
            return Err(TagServiceError::Validation("No fields to update".to_string()));
        }

        let mut tag = self.get_by_slug(slug).await?;

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            validate::require_text("name", &name, TAG_FIELD_MAX)
                .map_err(TagServiceError::Validation)?;
            if name != tag.name {
                if let Some(existing) = self
                    .repo
                    .get_by_name(&name)
                    .await
                    .context("Failed to check tag name")?
                {
                    if existing.id != tag.id {
                        return Err(TagServiceError::Duplicate(name));
                    }
                }
                tag.name = name;
            }
        }

        if let Some(new_slug) = input.slug {
            validate::require_slug("slug", &new_slug, TAG_FIELD_MAX)
                .map_err(TagServiceError::Validation)?;
            if new_slug != tag.slug {
                if let Some(existing) = self
                    .repo
                    .get_by_slug(&new_slug)
                    .await
                    .context("Failed to check tag slug")?
                {
                    if existing.id != tag.id {
                        return Err(TagServiceError::Duplicate(new_slug));
                    }
                }
                tag.slug = new_slug;
            }
        }

        self.repo.update(&tag).await.context("Failed to update tag")?;
        Ok(tag)
    }

    /// Delete the tag identified by `slug`
    pub async fn delete(&self, slug: &str) -> Result<(), TagServiceError> {
        let tag = self.get_by_slug(slug).await?;
        self.repo.delete(tag.id).await.context("Failed to delete tag")?;
        Ok(())
    }
}
