//! Database migrations
//!
//! Code-based migrations for the startuporg schema. All migrations are
//! embedded as SQL strings for single-binary deployment and applied in
//! version order; the `schema_migrations` table records what has run.
//!
//! # Usage
//!
//! ```ignore
//! use startuporg::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements to apply
    pub up: &'static str,
}

/// All migrations for the startuporg schema.
///
/// Dates are stored as TEXT in `YYYY-MM-DD` form, which is what sqlx writes
/// for `chrono::NaiveDate` and what the month-scoped unique index on posts
/// relies on.
pub const MIGRATIONS: &[Migration] = &[
    // Migration 1: organizer tables (tags, startups, news links)
    Migration {
        version: 1,
        name: "create_organizer",
        up: r#"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(31) NOT NULL UNIQUE,
                slug VARCHAR(31) NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS startups (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(31) NOT NULL,
                slug VARCHAR(31) NOT NULL UNIQUE,
                description TEXT NOT NULL,
                founded_date DATE NOT NULL,
                contact VARCHAR(254) NOT NULL,
                website VARCHAR(255) NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_startups_name ON startups(name);

            CREATE TABLE IF NOT EXISTS startup_tags (
                startup_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (startup_id, tag_id),
                FOREIGN KEY (startup_id) REFERENCES startups(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS news_links (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(31) NOT NULL,
                slug VARCHAR(31) NOT NULL,
                pub_date DATE NOT NULL,
                link VARCHAR(255) NOT NULL,
                startup_id INTEGER NOT NULL,
                UNIQUE (slug, startup_id),
                FOREIGN KEY (startup_id) REFERENCES startups(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_news_links_startup_id ON news_links(startup_id);
        "#,
    },
    // Migration 2: blog tables (posts and their associations)
    Migration {
        version: 2,
        name: "create_blog",
        up: r#"
            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(63) NOT NULL,
                slug VARCHAR(63) NOT NULL,
                text TEXT NOT NULL,
                pub_date DATE NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_posts_slug_month
                ON posts(slug, substr(pub_date, 1, 7));
            CREATE INDEX IF NOT EXISTS idx_posts_pub_date ON posts(pub_date);

            CREATE TABLE IF NOT EXISTS post_tags (
                post_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (post_id, tag_id),
                FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS post_startups (
                post_id INTEGER NOT NULL,
                startup_id INTEGER NOT NULL,
                PRIMARY KEY (post_id, startup_id),
                FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE,
                FOREIGN KEY (startup_id) REFERENCES startups(id) ON DELETE CASCADE
            );
        "#,
    },
];

/// Run all pending migrations against the given pool.
///
/// Each migration is applied inside a transaction together with its
/// `schema_migrations` record, so a failed migration leaves no partial
/// state behind.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    ensure_migrations_table(pool).await?;

    let applied = applied_versions(pool).await?;

    for migration in MIGRATIONS {
        if applied.contains(&(migration.version as i64)) {
            continue;
        }

        tracing::info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );

        let mut tx = pool
            .begin()
            .await
            .context("Failed to begin migration transaction")?;

        // SQLite executes one statement per call, so split the blob
        for statement in split_statements(migration.up) {
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .with_context(|| {
                    format!(
                        "Migration {} ({}) failed on statement: {}",
                        migration.version, migration.name, statement
                    )
                })?;
        }

        sqlx::query("INSERT INTO schema_migrations (version, name) VALUES (?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .execute(&mut *tx)
            .await
            .context("Failed to record migration")?;

        tx.commit()
            .await
            .with_context(|| format!("Failed to commit migration {}", migration.version))?;
    }

    Ok(())
}

async fn ensure_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create schema_migrations table")?;
    Ok(())
}

async fn applied_versions(pool: &SqlitePool) -> Result<Vec<i64>> {
    let rows = sqlx::query("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;
    Ok(rows.iter().map(|row| row.get("version")).collect())
}

fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
