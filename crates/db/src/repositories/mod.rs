//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod analytics_repo;
pub mod line_item_repo;
pub mod quote_image_repo;
pub mod quote_repo;

pub use analytics_repo::AnalyticsRepo;
pub use line_item_repo::{LineItemRepo, NewLineItem};
pub use quote_image_repo::QuoteImageRepo;
pub use quote_repo::QuoteRepo;
