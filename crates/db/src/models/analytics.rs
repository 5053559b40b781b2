//! Analytics session and event models.
//!
//! These rows are observational only: they never gate a quote transition
//! and are safe to lose. All DTOs use the camelCase wire format of the
//! public quote page.

use ridgeline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `analytics_sessions` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalyticsSession {
    pub id: DbId,
    pub session_id: String,
    pub quote_id: Option<DbId>,
    pub device_fingerprint: Option<String>,
    /// JSONB array of section identifiers, in first-view order.
    pub viewed_sections: serde_json::Value,
    pub scroll_depth_percent: i32,
    pub duration_secs: i32,
    pub started_at: Timestamp,
    pub last_seen_at: Timestamp,
}

/// A row from the `analytics_events` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalyticsEvent {
    pub id: DbId,
    pub session_id: String,
    pub quote_id: Option<DbId>,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub occurred_at: Timestamp,
}

/// DTO for starting (or refreshing) a view session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSession {
    pub session_id: String,
    pub device_fingerprint: Option<String>,
}

/// DTO for a discrete tracked event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEvent {
    pub session_id: String,
    pub event_type: String,
    pub payload: Option<serde_json::Value>,
}

/// DTO for the scroll-depth patch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollUpdate {
    pub session_id: String,
    pub scroll_depth_percent: i32,
}

/// DTO for the cumulative duration patch (periodic cadence and unload
/// beacon both land here).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationUpdate {
    pub session_id: String,
    pub duration_secs: i32,
}
