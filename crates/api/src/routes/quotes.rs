//! Route definitions for the staff quote administration surface,
//! mounted at `/admin/quotes`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::quotes;
use crate::state::AppState;

/// Staff quote routes mounted at `/admin/quotes`.
///
/// ```text
/// GET    /                             -> list_quotes
/// POST   /                             -> create_quote
/// GET    /{id}                         -> get_quote
/// PUT    /{id}                         -> update_quote
/// DELETE /{id}                         -> delete_quote
/// POST   /{id}/send                    -> send_quote
/// GET    /{id}/line-items              -> list_line_items
/// POST   /{id}/line-items              -> create_line_item
/// PUT    /{id}/line-items/{item_id}    -> update_line_item
/// DELETE /{id}/line-items/{item_id}    -> delete_line_item
/// GET    /{id}/images                  -> list_images
/// POST   /{id}/images                  -> create_image
/// DELETE /{id}/images/{image_id}       -> delete_image
/// GET    /{id}/analytics/events        -> list_quote_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(quotes::list_quotes).post(quotes::create_quote))
        .route(
            "/{id}",
            get(quotes::get_quote)
                .put(quotes::update_quote)
                .delete(quotes::delete_quote),
        )
        .route("/{id}/send", post(quotes::send_quote))
        .route(
            "/{id}/line-items",
            get(quotes::list_line_items).post(quotes::create_line_item),
        )
        .route(
            "/{id}/line-items/{item_id}",
            put(quotes::update_line_item).delete(quotes::delete_line_item),
        )
        .route(
            "/{id}/images",
            get(quotes::list_images).post(quotes::create_image),
        )
        .route("/{id}/images/{image_id}", delete(quotes::delete_image))
        .route("/{id}/analytics/events", get(quotes::list_quote_events))
}
