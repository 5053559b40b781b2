//! Repository for the `quotes` table.
//!
//! State transitions are conditional UPDATEs: the WHERE clause carries the
//! allowed source state, so concurrent requests race benignly (first
//! writer wins, later writers see zero rows and the caller re-reads).

use ridgeline_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::quote::{CreateQuote, Quote, UpdateQuote};

/// Column list for quotes queries.
const COLUMNS: &str = "id, quote_number, magic_token, status, customer_name, customer_email, \
    customer_phone, project_address, title, description, total_amount, valid_until, \
    viewed_at, responded_at, customer_response, customer_notes, paint_colors, \
    created_at, updated_at";

/// Provides CRUD and lifecycle operations for quotes.
pub struct QuoteRepo;

impl QuoteRepo {
    /// Insert a new quote in `draft` status.
    ///
    /// The magic token and quote number are issued by the caller before the
    /// INSERT; a quote row is never persisted without them.
    pub async fn create(
        pool: &PgPool,
        quote_number: &str,
        magic_token: &str,
        input: &CreateQuote,
    ) -> Result<Quote, sqlx::Error> {
        let total = input.total_amount.unwrap_or(Decimal::ZERO);
        let query = format!(
            "INSERT INTO quotes
                (quote_number, magic_token, customer_name, customer_email, customer_phone,
                 project_address, title, description, total_amount, valid_until)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(quote_number)
            .bind(magic_token)
            .bind(&input.customer_name)
            .bind(&input.customer_email)
            .bind(&input.customer_phone)
            .bind(&input.project_address)
            .bind(&input.title)
            .bind(&input.description)
            .bind(total)
            .bind(input.valid_until)
            .fetch_one(pool)
            .await
    }

    /// Find a quote by its internal id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quotes WHERE id = $1");
        sqlx::query_as::<_, Quote>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a quote by its magic token.
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quotes WHERE magic_token = $1");
        sqlx::query_as::<_, Quote>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// List quotes, newest first, optionally filtered by stored status.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Quote>, sqlx::Error> {
        if let Some(status) = status {
            let query = format!(
                "SELECT {COLUMNS} FROM quotes
                 WHERE status = $1
                 ORDER BY created_at DESC
                 LIMIT $2 OFFSET $3"
            );
            sqlx::query_as::<_, Quote>(&query)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        } else {
            let query = format!(
                "SELECT {COLUMNS} FROM quotes
                 ORDER BY created_at DESC
                 LIMIT $1 OFFSET $2"
            );
            sqlx::query_as::<_, Quote>(&query)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        }
    }

    /// Update staff-editable fields by id, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQuote,
    ) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!(
            "UPDATE quotes SET
                customer_name = COALESCE($2, customer_name),
                customer_email = COALESCE($3, customer_email),
                customer_phone = COALESCE($4, customer_phone),
                project_address = COALESCE($5, project_address),
                title = COALESCE($6, title),
                description = COALESCE($7, description),
                total_amount = COALESCE($8, total_amount),
                valid_until = COALESCE($9, valid_until),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(id)
            .bind(&input.customer_name)
            .bind(&input.customer_email)
            .bind(&input.customer_phone)
            .bind(&input.project_address)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.total_amount)
            .bind(input.valid_until)
            .fetch_optional(pool)
            .await
    }

    /// Delete a quote by id. Line items and images cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition `draft -> sent`.
    ///
    /// Returns `None` when the quote is missing or not in `draft`; the
    /// caller re-reads to distinguish the two.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!(
            "UPDATE quotes SET status = 'sent', updated_at = NOW()
             WHERE id = $1 AND status = 'draft'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Transition `sent -> viewed` on the first customer fetch.
    ///
    /// Idempotent by construction: the `status = 'sent'` guard means a
    /// second fetch (or a concurrent one) matches zero rows and `viewed_at`
    /// is stamped exactly once.
    pub async fn mark_viewed(pool: &PgPool, token: &str) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!(
            "UPDATE quotes SET status = 'viewed', viewed_at = NOW(), updated_at = NOW()
             WHERE magic_token = $1 AND status = 'sent'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Record the customer's terminal response (`viewed -> accepted|declined`).
    ///
    /// Terminal states are immutable: the `status = 'viewed'` guard plus the
    /// deadline check make resubmission and late submission no-ops, which
    /// the handler reports as a conflict.
    pub async fn record_response(
        pool: &PgPool,
        token: &str,
        response: &str,
        notes: Option<&str>,
        now: Timestamp,
    ) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!(
            "UPDATE quotes SET
                status = $2,
                customer_response = $2,
                customer_notes = COALESCE($3, customer_notes),
                responded_at = NOW(),
                updated_at = NOW()
             WHERE magic_token = $1
               AND status = 'viewed'
               AND (valid_until IS NULL OR valid_until >= $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(token)
            .bind(response)
            .bind(notes)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Merge color selections into `paint_colors` (JSONB shallow merge).
    ///
    /// Allowed in any non-terminal stored state; never touches `status`.
    pub async fn merge_colors(
        pool: &PgPool,
        token: &str,
        colors: &serde_json::Value,
    ) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!(
            "UPDATE quotes SET
                paint_colors = paint_colors || $2::jsonb,
                updated_at = NOW()
             WHERE magic_token = $1
               AND status NOT IN ('accepted', 'declined', 'expired')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(token)
            .bind(colors)
            .fetch_optional(pool)
            .await
    }

    /// Recompute `total_amount` as the sum of the quote's line-item totals.
    pub async fn recompute_total(pool: &PgPool, id: DbId) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!(
            "UPDATE quotes SET
                total_amount = (
                    SELECT COALESCE(SUM(total_price), 0)
                    FROM quote_line_items
                    WHERE quote_id = $1
                ),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
