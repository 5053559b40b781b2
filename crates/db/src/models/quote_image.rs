//! Quote image model and DTOs.
//!
//! Images store a URL reference only; the binary content lives with the
//! external file-storage collaborator.

use ridgeline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `quote_images` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuoteImage {
    pub id: DbId,
    pub quote_id: DbId,
    pub url: String,
    pub caption: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
}

/// DTO for attaching an image to a quote (staff).
#[derive(Debug, Deserialize)]
pub struct CreateQuoteImage {
    pub url: String,
    pub caption: Option<String>,
    pub sort_order: Option<i32>,
}
