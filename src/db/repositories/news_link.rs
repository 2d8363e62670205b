//! News link repository
//!
//! Database operations for news links. Every query is scoped to the owning
//! startup; the `(slug, startup_id)` unique constraint means lookups by slug
//! need the startup id as well.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::sync::Arc;

use crate::models::NewsLink;

/// News link repository trait
#[async_trait]
pub trait NewsLinkRepository: Send + Sync {
    /// Create a new news link
    async fn create(&self, link: &NewsLink) -> Result<NewsLink>;

    /// Get news link by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<NewsLink>>;

    /// Get news link by slug within a startup
    async fn get_by_slug(&self, startup_id: i64, slug: &str) -> Result<Option<NewsLink>>;

    /// List news links for a startup, newest first
    async fn list_for_startup(&self, startup_id: i64) -> Result<Vec<NewsLink>>;

    /// Update a news link's fields
    async fn update(&self, link: &NewsLink) -> Result<()>;

    /// Delete a news link
    async fn delete(&self, id: i64) -> Result<()>;
}

/// sqlx-based news link repository
pub struct SqlxNewsLinkRepository {
    pool: SqlitePool,
}

impl SqlxNewsLinkRepository {
    /// Create a new news link repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn NewsLinkRepository> {
        Arc::new(Self::new(pool))
    }
}

const NEWS_LINK_COLUMNS: &str = "id, name, slug, pub_date, link, startup_id";

#[async_trait]
impl NewsLinkRepository for SqlxNewsLinkRepository {
    async fn create(&self, link: &NewsLink) -> Result<NewsLink> {
        let result = sqlx::query(
            r#"
            INSERT INTO news_links (name, slug, pub_date, link, startup_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&link.name)
        .bind(&link.slug)
        .bind(link.pub_date)
        .bind(&link.link)
        .bind(link.startup_id)
        .execute(&self.pool)
        .await
        .context("Failed to create news link")?;

        Ok(NewsLink {
            id: result.last_insert_rowid(),
            ..link.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<NewsLink>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM news_links WHERE id = ?",
            NEWS_LINK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get news link by id")?;
        row.map(|r| row_to_news_link(&r)).transpose()
    }

    async fn get_by_slug(&self, startup_id: i64, slug: &str) -> Result<Option<NewsLink>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM news_links WHERE startup_id = ? AND slug = ?",
            NEWS_LINK_COLUMNS
        ))
        .bind(startup_id)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get news link by slug")?;
        row.map(|r| row_to_news_link(&r)).transpose()
    }

    async fn list_for_startup(&self, startup_id: i64) -> Result<Vec<NewsLink>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM news_links WHERE startup_id = ? ORDER BY pub_date DESC",
            NEWS_LINK_COLUMNS
        ))
        .bind(startup_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list news links")?;
        rows.iter().map(row_to_news_link).collect()
    }

    async fn update(&self, link: &NewsLink) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE news_links
            SET name = ?, slug = ?, pub_date = ?, link = ?
            WHERE id = ?
            "#,
        )
        .bind(&link.name)
        .bind(&link.slug)
        .bind(link.pub_date)
        .bind(&link.link)
        .bind(link.id)
        .execute(&self.pool)
        .await
        .context("Failed to update news link")?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM news_links WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete news link")?;
        Ok(())
    }
}

fn row_to_news_link(row: &SqliteRow) -> Result<NewsLink> {
    Ok(NewsLink {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        pub_date: row.get("pub_date"),
        link: row.get("link"),
        startup_id: row.get("startup_id"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::NaiveDate;

    async fn setup_test_repo() -> (SqlitePool, SqlxNewsLinkRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxNewsLinkRepository::new(pool.clone());
        (pool, repo)
    }

    /// Helper to create a startup row for ownership tests
    async fn create_test_startup(pool: &SqlitePool, slug: &str) -> i64 {
        let result = sqlx::query(
            r#"
            INSERT INTO startups (name, slug, description, founded_date, contact, website)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(format!("Startup {}", slug))
        .bind(slug)
        .bind("Description")
        .bind(NaiveDate::from_ymd_opt(2014, 9, 1).unwrap())
        .bind("contact@example.com")
        .bind("https://example.com")
        .execute(pool)
        .await
        .expect("Failed to create test startup");
        result.last_insert_rowid()
    }

    fn create_test_link(startup_id: i64, slug: &str, pub_date: (i32, u32, u32)) -> NewsLink {
        NewsLink::new(
            format!("Headline for {}", slug),
            slug.to_string(),
            NaiveDate::from_ymd_opt(pub_date.0, pub_date.1, pub_date.2).unwrap(),
            format!("https://news.example.com/{}", slug),
            startup_id,
        )
    }

    #[tokio::test]
    async fn test_create_and_get_news_link() {
        let (pool, repo) = setup_test_repo().await;
        let startup_id = create_test_startup(&pool, "jambon").await;

        let created = repo
            .create(&create_test_link(startup_id, "series-a", (2017, 5, 2)))
            .await
            .expect("Failed to create news link");
        assert!(created.id > 0);

        let found = repo
            .get_by_slug(startup_id, "series-a")
            .await
            .expect("Failed to get news link")
            .expect("News link not found");
        assert_eq!(found.startup_id, startup_id);
    }

    #[tokio::test]
    async fn test_duplicate_slug_same_startup_fails() {
        let (pool, repo) = setup_test_repo().await;
        let startup_id = create_test_startup(&pool, "jambon").await;

        repo.create(&create_test_link(startup_id, "funding", (2017, 5, 2)))
            .await
            .expect("Failed to create news link");

        let result = repo
            .create(&create_test_link(startup_id, "funding", (2018, 1, 1)))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_same_slug_different_startups_succeeds() {
        let (pool, repo) = setup_test_repo().await;
        let first = create_test_startup(&pool, "first").await;
        let second = create_test_startup(&pool, "second").await;

        repo.create(&create_test_link(first, "funding", (2017, 5, 2)))
            .await
            .expect("Failed to create news link");
        repo.create(&create_test_link(second, "funding", (2017, 6, 3)))
            .await
            .expect("Same slug under a different startup should succeed");
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (pool, repo) = setup_test_repo().await;
        let startup_id = create_test_startup(&pool, "jambon").await;

        repo.create(&create_test_link(startup_id, "oldest", (2015, 1, 1)))
            .await
            .expect("Failed to create news link");
        repo.create(&create_test_link(startup_id, "newest", (2019, 12, 31)))
            .await
            .expect("Failed to create news link");
        repo.create(&create_test_link(startup_id, "middle", (2017, 6, 15)))
            .await
            .expect("Failed to create news link");

        let links = repo
            .list_for_startup(startup_id)
            .await
            .expect("Failed to list news links");
        let slugs: Vec<_> = links.iter().map(|l| l.slug.as_str()).collect();
        assert_eq!(slugs, ["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_update_news_link() {
        let (pool, repo) = setup_test_repo().await;
        let startup_id = create_test_startup(&pool, "jambon").await;
        let mut link = repo
            .create(&create_test_link(startup_id, "launch", (2016, 3, 3)))
            .await
            .expect("Failed to create news link");

        link.link = "https://press.example.com/launch".to_string();
        repo.update(&link).await.expect("Failed to update news link");

        let found = repo
            .get_by_id(link.id)
            .await
            .expect("Failed to get news link")
            .expect("News link not found");
        assert_eq!(found.link, "https://press.example.com/launch");
    }

    #[tokio::test]
    async fn test_delete_news_link() {
        let (pool, repo) = setup_test_repo().await;
        let startup_id = create_test_startup(&pool, "jambon").await;
        let link = repo
            .create(&create_test_link(startup_id, "gone", (2016, 3, 3)))
            .await
            .expect("Failed to create news link");

        repo.delete(link.id).await.expect("Failed to delete news link");

        let found = repo.get_by_id(link.id).await.expect("Failed to get news link");
        assert!(found.is_none());
    }
}
