pub mod analytics;
pub mod health;
pub mod public;
pub mod quotes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /admin/quotes                                 list, create (staff JWT)
/// /admin/quotes/{id}                            get, update, delete
/// /admin/quotes/{id}/send                       draft -> sent (POST)
/// /admin/quotes/{id}/line-items                 list, create
/// /admin/quotes/{id}/line-items/{item_id}       update, delete
/// /admin/quotes/{id}/images                     list, create
/// /admin/quotes/{id}/images/{image_id}          delete
/// /admin/quotes/{id}/analytics/events           tracked events (GET)
///
/// /quotes/{token}                               fetch by magic token (public)
/// /quotes/{token}/respond                       accept or decline (POST)
/// /quotes/{token}/colors                        merge color selections (POST)
/// /quotes/public/{token}/line-items             customer-added item (POST)
/// /quotes/{quote_id}/analytics/session          start view session (POST)
/// /quotes/{quote_id}/analytics/track            record event (POST)
///
/// /analytics/session/scroll                     scroll-depth beacon (PATCH)
/// /analytics/session/duration                   duration beacon (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/admin/quotes", quotes::router())
        .nest("/quotes", public::router())
        .nest("/analytics", analytics::router())
}
