//! Repository for the `quote_images` table.

use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::quote_image::{CreateQuoteImage, QuoteImage};

/// Column list for quote_images queries.
const COLUMNS: &str = "id, quote_id, url, caption, sort_order, created_at";

/// Provides CRUD operations for quote images.
pub struct QuoteImageRepo;

impl QuoteImageRepo {
    /// Attach an image reference to a quote.
    pub async fn create(
        pool: &PgPool,
        quote_id: DbId,
        input: &CreateQuoteImage,
    ) -> Result<QuoteImage, sqlx::Error> {
        let sort_order = input.sort_order.unwrap_or(0);
        let query = format!(
            "INSERT INTO quote_images (quote_id, url, caption, sort_order)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuoteImage>(&query)
            .bind(quote_id)
            .bind(&input.url)
            .bind(&input.caption)
            .bind(sort_order)
            .fetch_one(pool)
            .await
    }

    /// List images for a quote in display order.
    pub async fn list_by_quote(
        pool: &PgPool,
        quote_id: DbId,
    ) -> Result<Vec<QuoteImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quote_images
             WHERE quote_id = $1
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, QuoteImage>(&query)
            .bind(quote_id)
            .fetch_all(pool)
            .await
    }

    /// Delete an image scoped to its quote. Returns `true` if a row was
    /// deleted.
    pub async fn delete(pool: &PgPool, quote_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quote_images WHERE id = $1 AND quote_id = $2")
            .bind(id)
            .bind(quote_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
