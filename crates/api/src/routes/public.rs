//! Route definitions for the customer-facing quote gateway,
//! mounted at `/quotes`.

use axum::routing::post;
use axum::{routing::get, Router};

use crate::handlers::{analytics, public_quotes};
use crate::state::AppState;

/// Public quote routes mounted at `/quotes`.
///
/// ```text
/// GET  /{token}                          -> get_quote
/// POST /{token}/respond                  -> respond
/// POST /{token}/colors                   -> select_colors
/// POST /public/{token}/line-items        -> add_line_item
/// POST /{quote_id}/analytics/session     -> start_session
/// POST /{quote_id}/analytics/track       -> track_event
/// ```
///
/// The router requires a single parameter name per path position, so the
/// analytics routes reuse `{token}` in the template; their handlers extract
/// the numeric quote id from it.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{token}", get(public_quotes::get_quote))
        .route("/{token}/respond", post(public_quotes::respond))
        .route("/{token}/colors", post(public_quotes::select_colors))
        .route(
            "/public/{token}/line-items",
            post(public_quotes::add_line_item),
        )
        .route("/{token}/analytics/session", post(analytics::start_session))
        .route("/{token}/analytics/track", post(analytics::track_event))
}
