//! Service layer
//!
//! Business logic on top of the repositories. Each service owns input
//! validation and the uniqueness pre-checks for its entity, and reports
//! failures through its own error enum. The database constraints remain the
//! backstop for anything that races past a pre-check.

pub mod news_link;
pub mod post;
pub mod startup;
pub mod tag;
pub mod validate;

pub use news_link::{NewsLinkService, NewsLinkServiceError};
pub use post::{PostService, PostServiceError};
pub use startup::{StartupService, StartupServiceError};
pub use tag::{TagService, TagServiceError};
