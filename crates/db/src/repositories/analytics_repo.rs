//! Repository for the analytics tables.
//!
//! Analytics rows are non-authoritative. Writers here are called from
//! fire-and-forget handlers that swallow errors, so nothing in this module
//! needs to be transactional with quote state.

use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::analytics::{AnalyticsEvent, AnalyticsSession};

/// Column list for analytics_sessions queries.
const SESSION_COLUMNS: &str = "id, session_id, quote_id, device_fingerprint, viewed_sections, \
    scroll_depth_percent, duration_secs, started_at, last_seen_at";

/// Column list for analytics_events queries.
const EVENT_COLUMNS: &str = "id, session_id, quote_id, event_type, payload, occurred_at";

/// Provides write paths for analytics sessions and events.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Insert or refresh a view session.
    ///
    /// A repeated POST for the same client-generated session id refreshes
    /// `last_seen_at` and fills in a quote id or fingerprint that arrived
    /// late, rather than erroring.
    pub async fn upsert_session(
        pool: &PgPool,
        session_id: &str,
        quote_id: Option<DbId>,
        device_fingerprint: Option<&str>,
    ) -> Result<AnalyticsSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO analytics_sessions (session_id, quote_id, device_fingerprint)
             VALUES ($1, $2, $3)
             ON CONFLICT (session_id) DO UPDATE SET
                quote_id = COALESCE(analytics_sessions.quote_id, EXCLUDED.quote_id),
                device_fingerprint =
                    COALESCE(analytics_sessions.device_fingerprint, EXCLUDED.device_fingerprint),
                last_seen_at = NOW()
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, AnalyticsSession>(&query)
            .bind(session_id)
            .bind(quote_id)
            .bind(device_fingerprint)
            .fetch_one(pool)
            .await
    }

    /// Append a discrete event.
    ///
    /// Events are not foreign-keyed to sessions: a track call may land
    /// before its session row does.
    pub async fn record_event(
        pool: &PgPool,
        session_id: &str,
        quote_id: Option<DbId>,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<AnalyticsEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO analytics_events (session_id, quote_id, event_type, payload)
             VALUES ($1, $2, $3, $4)
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, AnalyticsEvent>(&query)
            .bind(session_id)
            .bind(quote_id)
            .bind(event_type)
            .bind(payload)
            .fetch_one(pool)
            .await
    }

    /// Record a first-time section view on the session, preserving order
    /// and ignoring repeats.
    pub async fn append_viewed_section(
        pool: &PgPool,
        session_id: &str,
        section: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE analytics_sessions SET
                viewed_sections = viewed_sections || jsonb_build_array($2::text),
                last_seen_at = NOW()
             WHERE session_id = $1
               AND NOT (viewed_sections @> jsonb_build_array($2::text))",
        )
        .bind(session_id)
        .bind(section)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Raise the session's scroll depth (monotonic max, clamped by the
    /// caller). Returns `false` if the session is unknown.
    pub async fn update_scroll_depth(
        pool: &PgPool,
        session_id: &str,
        scroll_depth_percent: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE analytics_sessions SET
                scroll_depth_percent = GREATEST(scroll_depth_percent, $2),
                last_seen_at = NOW()
             WHERE session_id = $1",
        )
        .bind(session_id)
        .bind(scroll_depth_percent)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record cumulative time-on-page.
    ///
    /// The client reports a running total, so GREATEST keeps the write
    /// idempotent when the final beacon races a periodic report.
    pub async fn update_duration(
        pool: &PgPool,
        session_id: &str,
        duration_secs: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE analytics_sessions SET
                duration_secs = GREATEST(duration_secs, $2),
                last_seen_at = NOW()
             WHERE session_id = $1",
        )
        .bind(session_id)
        .bind(duration_secs)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a session by its client-generated id.
    pub async fn find_session(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Option<AnalyticsSession>, sqlx::Error> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM analytics_sessions WHERE session_id = $1"
        );
        sqlx::query_as::<_, AnalyticsSession>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// List events for a quote, oldest first (admin reporting).
    pub async fn list_events_by_quote(
        pool: &PgPool,
        quote_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AnalyticsEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM analytics_events
             WHERE quote_id = $1
             ORDER BY occurred_at ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, AnalyticsEvent>(&query)
            .bind(quote_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
