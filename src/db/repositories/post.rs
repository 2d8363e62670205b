//! Post repository
//!
//! Database operations for blog posts and their tag/startup associations.
//! Posts list newest first with ties broken by title, and slug uniqueness is
//! scoped to the calendar month of the publication date. The month scope is
//! backed by a unique index over `(slug, substr(pub_date, 1, 7))`, which
//! works because dates are stored as `YYYY-MM-DD` text.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::sync::Arc;

use crate::models::{ListParams, PagedResult, Post, Startup, Tag};

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post
    async fn create(&self, post: &Post) -> Result<Post>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// List posts page by page, newest first, then by title
    async fn list_paged(&self, params: &ListParams) -> Result<PagedResult<Post>>;

    /// The most recently published post
    async fn latest(&self) -> Result<Option<Post>>;

    /// Whether a post with this slug exists in the given `YYYY-MM` month,
    /// excluding the post with `exclude_id` (pass 0 when creating)
    async fn exists_in_month(&self, slug: &str, month: &str, exclude_id: i64) -> Result<bool>;

    /// Update a post's fields
    async fn update(&self, post: &Post) -> Result<()>;

    /// Delete a post
    async fn delete(&self, id: i64) -> Result<()>;

    /// Replace the set of tags associated with a post
    async fn set_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<()>;

    /// Replace the set of startups associated with a post
    async fn set_startups(&self, post_id: i64, startup_ids: &[i64]) -> Result<()>;

    /// Tags associated with a post, ordered by name
    async fn tags_for(&self, post_id: i64) -> Result<Vec<Tag>>;

    /// Startups associated with a post, ordered by name
    async fn startups_for(&self, post_id: i64) -> Result<Vec<Startup>>;
}

/// sqlx-based post repository
pub struct SqlxPostRepository {
    pool: SqlitePool,
}

impl SqlxPostRepository {
    /// Create a new post repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

const POST_COLUMNS: &str = "id, title, slug, text, pub_date";

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &Post) -> Result<Post> {
        let result = sqlx::query(
            "INSERT INTO posts (title, slug, text, pub_date) VALUES (?, ?, ?, ?)",
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.text)
        .bind(post.pub_date)
        .execute(&self.pool)
        .await
        .context("Failed to create post")?;

        Ok(Post {
            id: result.last_insert_rowid(),
            ..post.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get post by id")?;
        row.map(|r| row_to_post(&r)).transpose()
    }

    async fn list_paged(&self, params: &ListParams) -> Result<PagedResult<Post>> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM posts")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count posts")?
            .get("n");

        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts ORDER BY pub_date DESC, title LIMIT ? OFFSET ?",
            POST_COLUMNS
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts")?;

        let items: Vec<Post> = rows.iter().map(row_to_post).collect::<Result<_>>()?;
        Ok(PagedResult::new(items, total, params))
    }

    async fn latest(&self) -> Result<Option<Post>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM posts ORDER BY pub_date DESC, title LIMIT 1",
            POST_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get latest post")?;
        row.map(|r| row_to_post(&r)).transpose()
    }

    async fn exists_in_month(&self, slug: &str, month: &str, exclude_id: i64) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS n FROM posts
            WHERE slug = ? AND substr(pub_date, 1, 7) = ? AND id != ?
            "#,
        )
        .bind(slug)
        .bind(month)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check slug uniqueness for month")?;
        let count: i64 = row.get("n");
        Ok(count > 0)
    }

    async fn update(&self, post: &Post) -> Result<()> {
        sqlx::query("UPDATE posts SET title = ?, slug = ?, text = ?, pub_date = ? WHERE id = ?")
            .bind(&post.title)
            .bind(&post.slug)
            .bind(&post.text)
            .bind(post.pub_date)
            .bind(post.id)
            .execute(&self.pool)
            .await
            .context("Failed to update post")?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete post")?;
        Ok(())
    }

    async fn set_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear post tags")?;

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)")
                .bind(post_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .context("Failed to associate tag with post")?;
        }

        tx.commit().await.context("Failed to commit tag associations")?;
        Ok(())
    }

    async fn set_startups(&self, post_id: i64, startup_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM post_startups WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear post startups")?;

        for startup_id in startup_ids {
            sqlx::query("INSERT INTO post_startups (post_id, startup_id) VALUES (?, ?)")
                .bind(post_id)
                .bind(startup_id)
                .execute(&mut *tx)
                .await
                .context("Failed to associate startup with post")?;
        }

        tx.commit().await.context("Failed to commit startup associations")?;
        Ok(())
    }

    async fn tags_for(&self, post_id: i64) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.slug
            FROM tags t
            JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to get tags for post")?;

        rows.iter()
            .map(|row| {
                Ok(Tag {
                    id: row.get("id"),
                    name: row.get("name"),
                    slug: row.get("slug"),
                })
            })
            .collect()
    }

    async fn startups_for(&self, post_id: i64) -> Result<Vec<Startup>> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.name, s.slug, s.description, s.founded_date, s.contact, s.website
            FROM startups s
            JOIN post_startups ps ON ps.startup_id = s.id
            WHERE ps.post_id = ?
            ORDER BY s.name
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to get startups for post")?;

        rows.iter()
            .map(|row| {
                Ok(Startup {
                    id: row.get("id"),
                    name: row.get("name"),
                    slug: row.get("slug"),
                    description: row.get("description"),
                    founded_date: row.get("founded_date"),
                    contact: row.get("contact"),
                    website: row.get("website"),
                })
            })
            .collect()
    }
}

fn row_to_post(row: &SqliteRow) -> Result<Post> {
    Ok(Post {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        text: row.get("text"),
        pub_date: row.get("pub_date"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::NaiveDate;

    async fn setup_test_repo() -> (SqlitePool, SqlxPostRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxPostRepository::new(pool.clone());
        (pool, repo)
    }

    fn create_test_post(title: &str, slug: &str, pub_date: (i32, u32, u32)) -> Post {
        Post::new(
            title.to_string(),
            slug.to_string(),
            format!("Body of {}", title),
            NaiveDate::from_ymd_opt(pub_date.0, pub_date.1, pub_date.2),
        )
    }

    #[tokio::test]
    async fn test_create_and_get_post() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create(&create_test_post("Django Training", "django-training", (2013, 1, 18)))
            .await
            .expect("Failed to create post");
        assert!(created.id > 0);

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get post")
            .expect("Post not found");
        assert_eq!(found.title, "Django Training");
        assert_eq!(found.pub_date, NaiveDate::from_ymd_opt(2013, 1, 18).unwrap());
    }

    #[tokio::test]
    async fn test_same_slug_same_month_fails() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&create_test_post("First", "launch", (2017, 4, 1)))
            .await
            .expect("Failed to create post");

        let result = repo
            .create(&create_test_post("Second", "launch", (2017, 4, 28)))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_same_slug_different_month_succeeds() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&create_test_post("April", "launch", (2017, 4, 1)))
            .await
            .expect("Failed to create post");

        repo.create(&create_test_post("May", "launch", (2017, 5, 1)))
            .await
            .expect("Same slug in a different month should succeed");
    }

    #[tokio::test]
    async fn test_exists_in_month() {
        let (_pool, repo) = setup_test_repo().await;
        let post = repo
            .create(&create_test_post("Hello", "hello", (2018, 11, 11)))
            .await
            .expect("Failed to create post");

        assert!(repo
            .exists_in_month("hello", "2018-11", 0)
            .await
            .expect("Check should succeed"));
        assert!(!repo
            .exists_in_month("hello", "2018-12", 0)
            .await
            .expect("Check should succeed"));
        // The post itself is excluded when updating
        assert!(!repo
            .exists_in_month("hello", "2018-11", post.id)
            .await
            .expect("Check should succeed"));
    }

    #[tokio::test]
    async fn test_list_ordered_by_date_then_title() {
        let (_pool, repo) = setup_test_repo().await;

        repo.create(&create_test_post("Beta", "beta", (2017, 4, 2)))
            .await
            .expect("Failed to create post");
        repo.create(&create_test_post("Alpha", "alpha", (2017, 4, 2)))
            .await
            .expect("Failed to create post");
        repo.create(&create_test_post("Older", "older", (2016, 1, 1)))
            .await
            .expect("Failed to create post");
        repo.create(&create_test_post("Newest", "newest", (2019, 8, 8)))
            .await
            .expect("Failed to create post");

        let page = repo
            .list_paged(&ListParams::default())
            .await
            .expect("Failed to list posts");
        let titles: Vec<_> = page.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Newest", "Alpha", "Beta", "Older"]);
    }

    #[tokio::test]
    async fn test_latest_by_pub_date() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&create_test_post("Old", "old", (2015, 2, 2)))
            .await
            .expect("Failed to create post");
        repo.create(&create_test_post("New", "new", (2020, 6, 6)))
            .await
            .expect("Failed to create post");

        let latest = repo
            .latest()
            .await
            .expect("Failed to get latest")
            .expect("Expected a post");
        assert_eq!(latest.slug, "new");
    }

    #[tokio::test]
    async fn test_associations() {
        let (pool, repo) = setup_test_repo().await;
        let post = repo
            .create(&create_test_post("Tagged", "tagged", (2017, 7, 7)))
            .await
            .expect("Failed to create post");

        let tag_id = sqlx::query("INSERT INTO tags (name, slug) VALUES ('web', 'web')")
            .execute(&pool)
            .await
            .expect("Failed to create tag")
            .last_insert_rowid();

        let startup_id = sqlx::query(
            r#"
            INSERT INTO startups (name, slug, description, founded_date, contact, website)
            VALUES ('Acme', 'acme', 'desc', '2014-01-01', 'a@acme.com', 'https://acme.com')
            "#,
        )
        .execute(&pool)
        .await
        .expect("Failed to create startup")
        .last_insert_rowid();

        repo.set_tags(post.id, &[tag_id]).await.expect("Failed to set tags");
        repo.set_startups(post.id, &[startup_id])
            .await
            .expect("Failed to set startups");

        let tags = repo.tags_for(post.id).await.expect("Failed to get tags");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].slug, "web");

        let startups = repo.startups_for(post.id).await.expect("Failed to get startups");
        assert_eq!(startups.len(), 1);
        assert_eq!(startups[0].slug, "acme");

        // Deleting the post clears the join rows
        repo.delete(post.id).await.expect("Failed to delete post");
        let row = sqlx::query("SELECT COUNT(*) AS n FROM post_tags WHERE post_id = ?")
            .bind(post.id)
            .fetch_one(&pool)
            .await
            .expect("Query should succeed");
        let remaining: i64 = row.get("n");
        assert_eq!(remaining, 0);
    }
}
