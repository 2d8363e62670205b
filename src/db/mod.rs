//! Database layer
//!
//! SQLite persistence for startuporg. The schema is created by the
//! code-embedded migrations in [`migrations`]; all row access goes through
//! the repository traits in [`repositories`].
//!
//! # Usage
//!
//! ```ignore
//! use startuporg::config::DatabaseConfig;
//! use startuporg::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
