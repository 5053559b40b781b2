//! Quote line-item model and DTOs.

use ridgeline_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `quote_line_items` table.
///
/// `total_price` is computed in core from quantity, unit price, and
/// discount, then stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuoteLineItem {
    pub id: DbId,
    pub quote_id: DbId,
    pub category: String,
    pub description: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    pub total_price: Decimal,
    pub customer_added: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a line item (staff).
#[derive(Debug, Deserialize)]
pub struct CreateLineItem {
    pub category: String,
    pub description: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub discount_percent: Option<Decimal>,
}

/// DTO for updating a line item (staff). All fields optional.
#[derive(Debug, Deserialize)]
pub struct UpdateLineItem {
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub discount_percent: Option<Decimal>,
}

/// DTO for a customer-initiated line item (public surface, camelCase wire).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublicLineItem {
    pub category: String,
    pub description: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub discount_percent: Option<Decimal>,
}
