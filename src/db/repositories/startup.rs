//! Startup repository
//!
//! Database operations for startups, including the tag associations kept in
//! the `startup_tags` join table. Startups list alphabetically by name and
//! the most recently founded one is the "latest".

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::sync::Arc;

use crate::models::{ListParams, PagedResult, Startup, Tag};

/// Startup repository trait
#[async_trait]
pub trait StartupRepository: Send + Sync {
    /// Create a new startup
    async fn create(&self, startup: &Startup) -> Result<Startup>;

    /// Get startup by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Startup>>;

    /// Get startup by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Startup>>;

    /// List all startups, ordered by name
    async fn list(&self) -> Result<Vec<Startup>>;

    /// List startups page by page, ordered by name
    async fn list_paged(&self, params: &ListParams) -> Result<PagedResult<Startup>>;

    /// The most recently founded startup
    async fn latest(&self) -> Result<Option<Startup>>;

    /// Update a startup's fields
    async fn update(&self, startup: &Startup) -> Result<()>;

    /// Delete a startup; its news links go with it
    async fn delete(&self, id: i64) -> Result<()>;

    /// Replace the set of tags associated with a startup
    async fn set_tags(&self, startup_id: i64, tag_ids: &[i64]) -> Result<()>;

    /// Tags associated with a startup, ordered by name
    async fn tags_for(&self, startup_id: i64) -> Result<Vec<Tag>>;
}

/// sqlx-based startup repository
pub struct SqlxStartupRepository {
    pool: SqlitePool,
}

impl SqlxStartupRepository {
    /// Create a new startup repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn StartupRepository> {
        Arc::new(Self::new(pool))
    }
}

const STARTUP_COLUMNS: &str = "id, name, slug, description, founded_date, contact, website";

#[async_trait]
impl StartupRepository for SqlxStartupRepository {
    async fn create(&self, startup: &Startup) -> Result<Startup> {
        let result = sqlx::query(
            r#"
            INSERT INTO startups (name, slug, description, founded_date, contact, website)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&startup.name)
        .bind(&startup.slug)
        .bind(&startup.description)
        .bind(startup.founded_date)
        .bind(&startup.contact)
        .bind(&startup.website)
        .execute(&self.pool)
        .await
        .context("Failed to create startup")?;

        Ok(Startup {
            id: result.last_insert_rowid(),
            ..startup.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Startup>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM startups WHERE id = ?",
            STARTUP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get startup by id")?;
        row.map(|r| row_to_startup(&r)).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Startup>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM startups WHERE slug = ?",
            STARTUP_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get startup by slug")?;
        row.map(|r| row_to_startup(&r)).transpose()
    }

    async fn list(&self) -> Result<Vec<Startup>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM startups ORDER BY name",
            STARTUP_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list startups")?;
        rows.iter().map(row_to_startup).collect()
    }

    async fn list_paged(&self, params: &ListParams) -> Result<PagedResult<Startup>> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM startups")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count startups")?
            .get("n");

        let rows = sqlx::query(&format!(
            "SELECT {} FROM startups ORDER BY name LIMIT ? OFFSET ?",
            STARTUP_COLUMNS
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list startups")?;

        let items: Vec<Startup> = rows.iter().map(row_to_startup).collect::<Result<_>>()?;
        Ok(PagedResult::new(items, total, params))
    }

    async fn latest(&self) -> Result<Option<Startup>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM startups ORDER BY founded_date DESC LIMIT 1",
            STARTUP_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get latest startup")?;
        row.map(|r| row_to_startup(&r)).transpose()
    }

    async fn update(&self, startup: &Startup) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE startups
            SET name = ?, slug = ?, description = ?, founded_date = ?, contact = ?, website = ?
            WHERE id = ?
            "#,
        )
        .bind(&startup.name)
        .bind(&startup.slug)
        .bind(&startup.description)
        .bind(startup.founded_date)
        .bind(&startup.contact)
        .bind(&startup.website)
        .bind(startup.id)
        .execute(&self.pool)
        .await
        .context("Failed to update startup")?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // News links and join rows cascade via foreign keys
        sqlx::query("DELETE FROM startups WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete startup")?;
        Ok(())
    }

    async fn set_tags(&self, startup_id: i64, tag_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM startup_tags WHERE startup_id = ?")
            .bind(startup_id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear startup tags")?;

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO startup_tags (startup_id, tag_id) VALUES (?, ?)")
                .bind(startup_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .context("Failed to associate tag with startup")?;
        }

        tx.commit().await.context("Failed to commit tag associations")?;
        Ok(())
    }

    async fn tags_for(&self, startup_id: i64) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.slug
            FROM tags t
            JOIN startup_tags st ON st.tag_id = t.id
            WHERE st.startup_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(startup_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to get tags for startup")?;

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
}

fn row_to_startup(row: &SqliteRow) -> Result<Startup> {
    Ok(Startup {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: row.get("description"),
        founded_date: row.get("founded_date"),
        contact: row.get("contact"),
        website: row.get("website"),
    })
}
