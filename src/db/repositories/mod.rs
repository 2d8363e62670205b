//! Repositories
//!
//! One repository per entity, each defined as a trait plus a sqlx-backed
//! implementation. Services depend on the traits, which keeps the data
//! access swappable in tests.

pub mod news_link;
pub mod post;
pub mod startup;
pub mod tag;

pub use news_link::{NewsLinkRepository, SqlxNewsLinkRepository};
pub use post::{PostRepository, SqlxPostRepository};
pub use startup::{SqlxStartupRepository, StartupRepository};
pub use tag::{SqlxTagRepository, TagRepository};
