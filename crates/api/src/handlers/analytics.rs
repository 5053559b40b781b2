//! Handlers for the quote-page analytics beacons.
//!
//! Everything here is fire-and-forget: a lost beacon must never surface to
//! the customer, so database failures are logged and swallowed and every
//! endpoint answers 204. These writes are observational only and never
//! gate a quote transition.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use ridgeline_core::analytics::AnalyticsEventType;
use ridgeline_core::types::DbId;
use ridgeline_db::models::analytics::{DurationUpdate, ScrollUpdate, StartSession, TrackEvent};
use ridgeline_db::repositories::AnalyticsRepo;

use crate::state::AppState;

/// Log and discard a failed analytics write.
fn drop_write(err: sqlx::Error, what: &'static str) {
    tracing::warn!(error = %err, what, "Analytics write dropped");
}

/// POST /quotes/{quote_id}/analytics/session
///
/// Start or refresh a view session. Repeated posts with the same session
/// id refresh `last_seen_at` and fill in fields that arrived late.
pub async fn start_session(
    State(state): State<AppState>,
    Path(quote_id): Path<DbId>,
    Json(input): Json<StartSession>,
) -> StatusCode {
    if let Err(err) = AnalyticsRepo::upsert_session(
        &state.pool,
        &input.session_id,
        Some(quote_id),
        input.device_fingerprint.as_deref(),
    )
    .await
    {
        drop_write(err, "session");
    }

    StatusCode::NO_CONTENT
}

/// POST /quotes/{quote_id}/analytics/track
///
/// Record a discrete event. A `page_view` event carrying a `section` field
/// also marks that section as viewed on the session, preserving first-view
/// order.
pub async fn track_event(
    State(state): State<AppState>,
    Path(quote_id): Path<DbId>,
    Json(input): Json<TrackEvent>,
) -> StatusCode {
    let event_type = match AnalyticsEventType::parse(&input.event_type) {
        Ok(t) => t,
        Err(_) => {
            tracing::warn!(event_type = %input.event_type, "Unknown analytics event type dropped");
            return StatusCode::NO_CONTENT;
        }
    };

    let payload = input.payload.unwrap_or_else(|| serde_json::json!({}));

    if event_type == AnalyticsEventType::PageView {
        if let Some(section) = payload.get("section").and_then(|v| v.as_str()) {
            if let Err(err) =
                AnalyticsRepo::append_viewed_section(&state.pool, &input.session_id, section).await
            {
                drop_write(err, "viewed_section");
            }
        }
    }

    if let Err(err) = AnalyticsRepo::record_event(
        &state.pool,
        &input.session_id,
        Some(quote_id),
        event_type.as_str(),
        &payload,
    )
    .await
    {
        drop_write(err, "event");
    }

    StatusCode::NO_CONTENT
}

/// PATCH /analytics/session/scroll
///
/// Report the deepest scroll position reached. Depth only ever increases;
/// a stale report is a no-op.
pub async fn update_scroll(
    State(state): State<AppState>,
    Json(input): Json<ScrollUpdate>,
) -> StatusCode {
    let depth = input.scroll_depth_percent.clamp(0, 100);

    if let Err(err) = AnalyticsRepo::update_scroll_depth(&state.pool, &input.session_id, depth).await
    {
        drop_write(err, "scroll_depth");
    }

    StatusCode::NO_CONTENT
}

/// PATCH /analytics/session/duration
///
/// Report the cumulative time on page. The periodic cadence and the unload
/// beacon both land here; the stored value only ever grows.
pub async fn update_duration(
    State(state): State<AppState>,
    Json(input): Json<DurationUpdate>,
) -> StatusCode {
    let duration = input.duration_secs.max(0);

    if let Err(err) = AnalyticsRepo::update_duration(&state.pool, &input.session_id, duration).await
    {
        drop_write(err, "duration");
    }

    StatusCode::NO_CONTENT
}
