//! Route definitions for the session-scoped analytics beacons,
//! mounted at `/analytics`.

use axum::routing::patch;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Session beacon routes mounted at `/analytics`.
///
/// ```text
/// PATCH /session/scroll    -> update_scroll
/// PATCH /session/duration  -> update_duration
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session/scroll", patch(analytics::update_scroll))
        .route("/session/duration", patch(analytics::update_duration))
}
