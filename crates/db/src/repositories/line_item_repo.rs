//! Repository for the `quote_line_items` table.

use ridgeline_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::line_item::QuoteLineItem;

/// Column list for quote_line_items queries.
const COLUMNS: &str = "id, quote_id, category, description, quantity, unit, unit_price, \
    discount_percent, total_price, customer_added, created_at, updated_at";

/// Field values for an insert, with the total already computed in core.
#[derive(Debug)]
pub struct NewLineItem<'a> {
    pub category: &'a str,
    pub description: &'a str,
    pub quantity: Decimal,
    pub unit: &'a str,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    pub total_price: Decimal,
    pub customer_added: bool,
}

/// Provides CRUD operations for quote line items.
pub struct LineItemRepo;

impl LineItemRepo {
    /// Insert a line item for a quote, returning the created row.
    pub async fn create(
        pool: &PgPool,
        quote_id: DbId,
        item: &NewLineItem<'_>,
    ) -> Result<QuoteLineItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO quote_line_items
                (quote_id, category, description, quantity, unit, unit_price,
                 discount_percent, total_price, customer_added)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuoteLineItem>(&query)
            .bind(quote_id)
            .bind(item.category)
            .bind(item.description)
            .bind(item.quantity)
            .bind(item.unit)
            .bind(item.unit_price)
            .bind(item.discount_percent)
            .bind(item.total_price)
            .bind(item.customer_added)
            .fetch_one(pool)
            .await
    }

    /// List line items for a quote, oldest first.
    pub async fn list_by_quote(
        pool: &PgPool,
        quote_id: DbId,
    ) -> Result<Vec<QuoteLineItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quote_line_items
             WHERE quote_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, QuoteLineItem>(&query)
            .bind(quote_id)
            .fetch_all(pool)
            .await
    }

    /// Find a line item scoped to its quote.
    pub async fn find_by_id(
        pool: &PgPool,
        quote_id: DbId,
        id: DbId,
    ) -> Result<Option<QuoteLineItem>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM quote_line_items WHERE id = $1 AND quote_id = $2");
        sqlx::query_as::<_, QuoteLineItem>(&query)
            .bind(id)
            .bind(quote_id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite a line item's fields (the handler recomputes the total
    /// before calling), returning the updated row.
    pub async fn update(
        pool: &PgPool,
        quote_id: DbId,
        id: DbId,
        item: &NewLineItem<'_>,
    ) -> Result<Option<QuoteLineItem>, sqlx::Error> {
        let query = format!(
            "UPDATE quote_line_items SET
                category = $3,
                description = $4,
                quantity = $5,
                unit = $6,
                unit_price = $7,
                discount_percent = $8,
                total_price = $9,
                updated_at = NOW()
             WHERE id = $1 AND quote_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuoteLineItem>(&query)
            .bind(id)
            .bind(quote_id)
            .bind(item.category)
            .bind(item.description)
            .bind(item.quantity)
            .bind(item.unit)
            .bind(item.unit_price)
            .bind(item.discount_percent)
            .bind(item.total_price)
            .fetch_optional(pool)
            .await
    }

    /// Delete a line item scoped to its quote. Returns `true` if a row was
    /// deleted.
    pub async fn delete(pool: &PgPool, quote_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quote_line_items WHERE id = $1 AND quote_id = $2")
            .bind(id)
            .bind(quote_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
