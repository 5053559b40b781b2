//! Quote model and DTOs.

use ridgeline_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `quotes` table.
///
/// `status` holds the stored lifecycle string; readers derive the effective
/// status (lazy expiry) through `ridgeline_core::quote_status` before
/// returning it to a client. `magic_token` is immutable once issued.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Quote {
    pub id: DbId,
    pub quote_number: String,
    pub magic_token: String,
    pub status: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub project_address: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub total_amount: Decimal,
    pub valid_until: Option<Timestamp>,
    pub viewed_at: Option<Timestamp>,
    pub responded_at: Option<Timestamp>,
    pub customer_response: Option<String>,
    pub customer_notes: Option<String>,
    pub paint_colors: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new quote (staff).
#[derive(Debug, Deserialize)]
pub struct CreateQuote {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub project_address: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub total_amount: Option<Decimal>,
    pub valid_until: Option<Timestamp>,
}

/// DTO for updating a quote (staff). All fields optional.
#[derive(Debug, Deserialize)]
pub struct UpdateQuote {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub project_address: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub total_amount: Option<Decimal>,
    pub valid_until: Option<Timestamp>,
}

/// Query parameters for the admin quote list.
#[derive(Debug, Deserialize)]
pub struct QuoteListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Customer response submission (public surface).
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub response: String,
    pub notes: Option<String>,
}

/// Customer color-selection merge (public surface).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitColors {
    pub paint_colors: std::collections::HashMap<String, String>,
}
