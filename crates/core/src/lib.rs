//! Domain logic for the Ridgeline quote service.
//!
//! Pure business rules with no HTTP or database dependencies: the quote
//! state machine, magic-token issuance, line-item arithmetic, analytics
//! session tracking, and shared error/pagination helpers.

pub mod analytics;
pub mod dedup;
pub mod error;
pub mod line_items;
pub mod pagination;
pub mod quote_status;
pub mod quotes;
pub mod token;
pub mod types;
