//! Post service
//!
//! Business logic for blog posts: validation, slug derivation, the
//! month-scoped slug pre-check, the default publication date, and the tag
//! and startup associations that tie the blog to the organizer domain.

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::db::repositories::{PostRepository, StartupRepository, TagRepository};
use crate::models::post::POST_FIELD_MAX;
use crate::models::{
    CreatePostInput, ListParams, PagedResult, Post, Startup, Tag, UpdatePostInput,
};
use crate::services::validate;

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Post not found
    #[error("Post not found: {0}")]
    NotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate slug within the month
    #[error("Post slug already used in {month}: {slug}")]
    DuplicateSlug {
        /// The conflicting slug
        slug: String,
        /// The `YYYY-MM` month it is already used in
        month: String,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Post service
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    tag_repo: Arc<dyn TagRepository>,
    startup_repo: Arc<dyn StartupRepository>,
}

impl PostService {
    /// Create a new post service
    pub fn new(
        repo: Arc<dyn PostRepository>,
        tag_repo: Arc<dyn TagRepository>,
        startup_repo: Arc<dyn StartupRepository>,
    ) -> Self {
        Self {
            repo,
            tag_repo,
            startup_repo,
        }
    }

    /// Create a new post, optionally associating tags and startups.
    ///
    /// The publication date defaults to today and the slug is derived from
    /// the title when the input omits them. The slug must be unused within
    /// the calendar month of the publication date.
    pub async fn create(
        &self,
        input: CreatePostInput,
        tag_ids: Option<Vec<i64>>,
        startup_ids: Option<Vec<i64>>,
    ) -> Result<Post, PostServiceError> {
        let title = input.title.trim().to_string();
        validate::require_text("title", &title, POST_FIELD_MAX)
            .map_err(PostServiceError::Validation)?;
        if input.text.trim().is_empty() {
            return Err(PostServiceError::Validation("text cannot be empty".to_string()));
        }

        let slug = match input.slug {
            Some(slug) => {
                validate::require_slug("slug", &slug, POST_FIELD_MAX)
                    .map_err(PostServiceError::Validation)?;
                slug
            }
            None => validate::derive_slug(&title, POST_FIELD_MAX)
                .map_err(PostServiceError::Validation)?,
        };

        let pub_date = input.pub_date.unwrap_or_else(|| Utc::now().date_naive());
        self.check_month_slug(&slug, pub_date, 0).await?;

        if let Some(ids) = &tag_ids {
            self.check_tags_exist(ids).await?;
        }
        if let Some(ids) = &startup_ids {
            self.check_startups_exist(ids).await?;
        }

        let post = Post::new(title, slug, input.text, Some(pub_date));
        let created = self.repo.create(&post).await.context("Failed to create post")?;

        if let Some(ids) = tag_ids {
            self.repo
                .set_tags(created.id, &ids)
                .await
                .context("Failed to associate tags")?;
        }
        if let Some(ids) = startup_ids {
            self.repo
                .set_startups(created.id, &ids)
                .await
                .context("Failed to associate startups")?;
        }

        Ok(created)
    }

    /// Get post by ID
    pub async fn get(&self, id: i64) -> Result<Post, PostServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or(PostServiceError::NotFound(id))
    }

    /// List posts page by page, newest first, ties broken by title
    pub async fn list_paged(&self, params: &ListParams) -> Result<PagedResult<Post>, PostServiceError> {
        Ok(self.repo.list_paged(params).await.context("Failed to list posts")?)
    }

    /// The most recently published post
    pub async fn latest(&self) -> Result<Post, PostServiceError> {
        self.repo
            .latest()
            .await
            .context("Failed to get latest post")?
            .ok_or(PostServiceError::NotFound(0))
    }

    /// Tags associated with a post
    pub async fn tags_for(&self, post_id: i64) -> Result<Vec<Tag>, PostServiceError> {
        Ok(self.repo.tags_for(post_id).await.context("Failed to get post tags")?)
    }

    /// Startups associated with a post
    pub async fn startups_for(&self, post_id: i64) -> Result<Vec<Startup>, PostServiceError> {
        Ok(self
            .repo
            .startups_for(post_id)
            .await
            .context("Failed to get post startups")?)
    }

    /// Update the post identified by `id`, optionally replacing its
    /// associations. Changing the slug or the publication date re-runs the
    /// month-scope check against the resulting pair.
    pub async fn update(
        &self,
        id: i64,
        input: UpdatePostInput,
        tag_ids: Option<Vec<i64>>,
        startup_ids: Option<Vec<i64>>,
    ) -> Result<Post, PostServiceError> {
        if !input.has_changes() && tag_ids.is_none() && startup_ids.is_none() {
            return Err(PostServiceError::Validation("No fields to update".to_string()));
        }

        let mut post = self.get(id).await?;

        if let Some(title) = input.title {
            let title = title.trim().to_string();
            validate::require_text("title", &title, POST_FIELD_MAX)
                .map_err(PostServiceError::Validation)?;
            post.title = title;
        }
        if let Some(slug) = input.slug {
            validate::require_slug("slug", &slug, POST_FIELD_MAX)
                .map_err(PostServiceError::Validation)?;
            post.slug = slug;
        }
        if let Some(text) = input.text {
            if text.trim().is_empty() {
                return Err(PostServiceError::Validation("text cannot be empty".to_string()));
            }
            post.text = text;
        }
        if let Some(pub_date) = input.pub_date {
            post.pub_date = pub_date;
        }

        self.check_month_slug(&post.slug, post.pub_date, post.id).await?;

        self.repo.update(&post).await.context("Failed to update post")?;

        if let Some(ids) = tag_ids {
            self.check_tags_exist(&ids).await?;
            self.repo
                .set_tags(post.id, &ids)
                .await
                .context("Failed to associate tags")?;
        }
        if let Some(ids) = startup_ids {
            self.check_startups_exist(&ids).await?;
            self.repo
                .set_startups(post.id, &ids)
                .await
                .context("Failed to associate startups")?;
        }

        Ok(post)
    }

    /// Delete the post identified by `id`
    pub async fn delete(&self, id: i64) -> Result<(), PostServiceError> {
        let post = self.get(id).await?;
        self.repo.delete(post.id).await.context("Failed to delete post")?;
        Ok(())
    }

    async fn check_month_slug(
        &self,
        slug: &str,
        pub_date: NaiveDate,
        exclude_id: i64,
    ) -> Result<(), PostServiceError> {
        let month = pub_date.format("%Y-%m").to_string();
        if self
            .repo
            .exists_in_month(slug, &month, exclude_id)
            .await
            .context("Failed to check slug for month")?
        {
            return Err(PostServiceError::DuplicateSlug {
                slug: slug.to_string(),
                month,
            });
        }
        Ok(())
    }

    async fn check_tags_exist(&self, tag_ids: &[i64]) -> Result<(), PostServiceError> {
        for id in tag_ids {
            if self
                .tag_repo
                .get_by_id(*id)
                .await
                .context("Failed to check tag")?
                .is_none()
            {
                return Err(PostServiceError::Validation(format!("Unknown tag id: {}", id)));
            }
        }
        Ok(())
    }

    async fn check_startups_exist(&self, startup_ids: &[i64]) -> Result<(), PostServiceError> {
        for id in startup_ids {
            if self
                .startup_repo
                .get_by_id(*id)
                .await
                .context("Failed to check startup")?
                .is_none()
            {
                return Err(PostServiceError::Validation(format!(
                    "Unknown startup id: {}",
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
    use crate::db::repositories::{SqlxPostRepository, SqlxStartupRepository, SqlxTagRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup_service() -> PostService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        PostService::new(
            SqlxPostRepository::boxed(pool.clone()),
            SqlxTagRepository::boxed(pool.clone()),
            SqlxStartupRepository::boxed(pool),
        )
    }

    fn input(title: &str, slug: Option<&str>, pub_date: Option<(i32, u32, u32)>) -> CreatePostInput {
        CreatePostInput {
            title: title.to_string(),
            slug: slug.map(String::from),
            text: format!("Body of {}", title),
            pub_date: pub_date.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_pub_date_to_today() {
        let service = setup_service().await;

        let post = service
            .create(input("Hello World", None, None), None, None)
            .await
            .expect("Failed to create post");
        assert_eq!(post.pub_date, Utc::now().date_naive());
        assert_eq!(post.slug, "hello-world");
    }

    #[tokio::test]
    async fn test_same_slug_same_month_is_conflict() {
        let service = setup_service().await;
        service
            .create(input("First", Some("launch"), Some((2017, 4, 1))), None, None)
            .await
            .expect("Failed to create post");

        let result = service
            .create(input("Second", Some("launch"), Some((2017, 4, 20))), None, None)
            .await;
        assert!(matches!(result, Err(PostServiceError::DuplicateSlug { .. })));
    }

    #[tokio::test]
    async fn test_same_slug_next_month_is_fine() {
        let service = setup_service().await;
        service
            .create(input("April", Some("launch"), Some((2017, 4, 1))), None, None)
            .await
            .expect("Failed to create post");

        service
            .create(input("May", Some("launch"), Some((2017, 5, 1))), None, None)
            .await
            .expect("Same slug in a different month should succeed");
    }

    #[tokio::test]
    async fn test_create_rejects_unsluggable_title() {
        let service = setup_service().await;

        let result = service.create(input("!!!", None, None), None, None).await;
        assert!(matches!(result, Err(PostServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_text() {
        let service = setup_service().await;

        let mut bad = input("Empty", None, None);
        bad.text = "  ".to_string();
        let result = service.create(bad, None, None).await;
        assert!(matches!(result, Err(PostServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_into_taken_month_is_conflict() {
        let service = setup_service().await;
        service
            .create(input("April", Some("launch"), Some((2017, 4, 1))), None, None)
            .await
            .expect("Failed to create post");
        let may = service
            .create(input("May", Some("launch"), Some((2017, 5, 1))), None, None)
            .await
            .expect("Failed to create post");

        // Moving the May post back into April collides with the April one
        let result = service
            .update(
                may.id,
                UpdatePostInput {
                    pub_date: NaiveDate::from_ymd_opt(2017, 4, 15),
                    ..Default::default()
                },
                None,
                None,
            )
            .await;
        assert!(matches!(result, Err(PostServiceError::DuplicateSlug { .. })));
    }

    #[tokio::test]
    async fn test_update_keeping_own_slug_is_fine() {
        let service = setup_service().await;
        let post = service
            .create(input("Hello", Some("hello"), Some((2018, 3, 3))), None, None)
            .await
            .expect("Failed to create post");

        // Only the title changes; the (slug, month) pair stays the post's own
        let updated = service
            .update(
                post.id,
                UpdatePostInput {
                    title: Some("Hello Again".to_string()),
                    ..Default::default()
                },
                None,
                None,
            )
            .await
            .expect("Update should succeed");
        assert_eq!(updated.title, "Hello Again");
    }

    #[tokio::test]
    async fn test_unknown_association_is_rejected() {
        let service = setup_service().await;

        let result = service
            .create(input("Hello", None, None), Some(vec![42]), None)
            .await;
        assert!(matches!(result, Err(PostServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let service = setup_service().await;

        let result = service.delete(12345).await;
        assert!(matches!(result, Err(PostServiceError::NotFound(_))));
    }
}
