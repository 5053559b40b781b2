//! Handlers for the staff quote administration surface.
//!
//! Provides quote CRUD, the draft-to-sent transition, line-item and image
//! management, and per-quote analytics reporting. Everything here requires
//! a valid staff JWT; the customer-facing surface lives in
//! [`super::public_quotes`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;

use ridgeline_core::error::CoreError;
use ridgeline_core::line_items::{line_item_total, validate_category, validate_pricing};
use ridgeline_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use ridgeline_core::quote_status::{effective_status, QuoteStatus};
use ridgeline_core::quotes::{validate_email, validate_quote_fields};
use ridgeline_core::token;
use ridgeline_core::types::DbId;
use ridgeline_db::models::line_item::{CreateLineItem, QuoteLineItem, UpdateLineItem};
use ridgeline_db::models::quote::{CreateQuote, Quote, QuoteListParams, UpdateQuote};
use ridgeline_db::models::quote_image::{CreateQuoteImage, QuoteImage};
use ridgeline_db::repositories::{
    AnalyticsRepo, LineItemRepo, NewLineItem, QuoteImageRepo, QuoteRepo,
};

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Full quote detail: the row plus its line items and images.
///
/// `effective_status` is the lazily-derived status (`expired` when the
/// validity deadline has passed); `status` inside the flattened quote is
/// what is actually stored.
#[derive(Debug, serde::Serialize)]
pub struct QuoteDetail {
    #[serde(flatten)]
    pub quote: Quote,
    pub effective_status: String,
    pub line_items: Vec<QuoteLineItem>,
    pub images: Vec<QuoteImage>,
}

/// Query parameters for the per-quote analytics event list.
#[derive(Debug, serde::Deserialize)]
pub struct EventListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Quote Handlers
// ---------------------------------------------------------------------------

/// GET /admin/quotes?status=&limit=&offset=
///
/// List quotes, newest first, optionally filtered by stored status.
pub async fn list_quotes(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<QuoteListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref status) = params.status {
        QuoteStatus::parse(status)?;
    }

    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let quotes = QuoteRepo::list(&state.pool, params.status.as_deref(), limit, offset).await?;

    Ok(Json(DataResponse { data: quotes }))
}

/// POST /admin/quotes
///
/// Create a new quote in `draft` status. The quote number and magic token
/// are issued here; a generated quote number that collides with an existing
/// one is regenerated once before the error propagates.
pub async fn create_quote(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateQuote>,
) -> AppResult<impl IntoResponse> {
    validate_quote_fields(&input.title, &input.customer_name, &input.customer_email)?;

    let mut retried = false;
    let quote = loop {
        let quote_number = token::quote_number(Utc::now());
        let magic_token = token::magic_token();

        match QuoteRepo::create(&state.pool, &quote_number, &magic_token, &input).await {
            Ok(quote) => break quote,
            Err(err) if !retried && is_unique_violation(&err, "uq_quotes_quote_number") => {
                tracing::warn!(%quote_number, "Quote number collided, regenerating");
                retried = true;
            }
            Err(err) => return Err(err.into()),
        }
    };

    tracing::info!(
        user_id = auth.user_id,
        quote_id = quote.id,
        quote_number = %quote.quote_number,
        "Quote created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: quote })))
}

/// GET /admin/quotes/{id}
///
/// Get a quote with its line items and images.
pub async fn get_quote(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let quote = QuoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quote", id }))?;

    let stored = super::stored_status(&quote)?;
    let effective = effective_status(stored, quote.valid_until, Utc::now());

    let line_items = LineItemRepo::list_by_quote(&state.pool, id).await?;
    let images = QuoteImageRepo::list_by_quote(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: QuoteDetail {
            quote,
            effective_status: effective.as_str().to_string(),
            line_items,
            images,
        },
    }))
}

/// PUT /admin/quotes/{id}
///
/// Update staff-editable quote fields.
pub async fn update_quote(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuote>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref title) = input.title {
        if title.trim().is_empty() {
            return Err(AppError::BadRequest("title must not be empty".into()));
        }
    }
    if let Some(ref name) = input.customer_name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "customer_name must not be empty".into(),
            ));
        }
    }
    if let Some(ref email) = input.customer_email {
        validate_email(email)?;
    }

    let quote = QuoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quote", id }))?;

    tracing::info!(user_id = auth.user_id, quote_id = id, "Quote updated");

    Ok(Json(DataResponse { data: quote }))
}

/// DELETE /admin/quotes/{id}
///
/// Delete a quote. Line items and images cascade.
pub async fn delete_quote(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = QuoteRepo::delete(&state.pool, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Quote", id }));
    }

    tracing::info!(user_id = auth.user_id, quote_id = id, "Quote deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /admin/quotes/{id}/send
///
/// Transition a draft quote to `sent`, making its magic link live.
pub async fn send_quote(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if let Some(quote) = QuoteRepo::mark_sent(&state.pool, id).await? {
        tracing::info!(
            user_id = auth.user_id,
            quote_id = id,
            quote_number = %quote.quote_number,
            "Quote sent"
        );
        return Ok(Json(DataResponse { data: quote }));
    }

    // Zero rows: either the quote is missing or it is not a draft.
    let quote = QuoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quote", id }))?;

    Err(AppError::Core(CoreError::Conflict(format!(
        "only draft quotes can be sent; quote is '{}'",
        quote.status
    ))))
}

// ---------------------------------------------------------------------------
// Line Item Handlers
// ---------------------------------------------------------------------------

/// Resolve the effective discount for a create/update payload.
fn discount_or_zero(discount: Option<Decimal>) -> Decimal {
    discount.unwrap_or(Decimal::ZERO)
}

async fn require_quote(state: &AppState, id: DbId) -> AppResult<Quote> {
    QuoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quote", id }))
}

/// GET /admin/quotes/{id}/line-items
///
/// List a quote's line items, oldest first.
pub async fn list_line_items(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_quote(&state, id).await?;
    let items = LineItemRepo::list_by_quote(&state.pool, id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /admin/quotes/{id}/line-items
///
/// Add a line item and recompute the quote total.
pub async fn create_line_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateLineItem>,
) -> AppResult<impl IntoResponse> {
    require_quote(&state, id).await?;

    validate_category(&input.category)?;
    let discount = discount_or_zero(input.discount_percent);
    validate_pricing(input.quantity, input.unit_price, discount)?;

    let item = LineItemRepo::create(
        &state.pool,
        id,
        &NewLineItem {
            category: &input.category,
            description: &input.description,
            quantity: input.quantity,
            unit: &input.unit,
            unit_price: input.unit_price,
            discount_percent: discount,
            total_price: line_item_total(input.quantity, input.unit_price, discount),
            customer_added: false,
        },
    )
    .await?;

    QuoteRepo::recompute_total(&state.pool, id).await?;

    tracing::info!(
        user_id = auth.user_id,
        quote_id = id,
        line_item_id = item.id,
        "Line item created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /admin/quotes/{id}/line-items/{item_id}
///
/// Update a line item and recompute the quote total. Omitted fields keep
/// their current values.
pub async fn update_line_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateLineItem>,
) -> AppResult<impl IntoResponse> {
    let existing = LineItemRepo::find_by_id(&state.pool, id, item_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "QuoteLineItem",
            id: item_id,
        }))?;

    let category = input.category.unwrap_or(existing.category);
    let description = input.description.unwrap_or(existing.description);
    let quantity = input.quantity.unwrap_or(existing.quantity);
    let unit = input.unit.unwrap_or(existing.unit);
    let unit_price = input.unit_price.unwrap_or(existing.unit_price);
    let discount = input.discount_percent.unwrap_or(existing.discount_percent);

    validate_category(&category)?;
    validate_pricing(quantity, unit_price, discount)?;

    let item = LineItemRepo::update(
        &state.pool,
        id,
        item_id,
        &NewLineItem {
            category: &category,
            description: &description,
            quantity,
            unit: &unit,
            unit_price,
            discount_percent: discount,
            total_price: line_item_total(quantity, unit_price, discount),
            customer_added: existing.customer_added,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "QuoteLineItem",
        id: item_id,
    }))?;

    QuoteRepo::recompute_total(&state.pool, id).await?;

    tracing::info!(
        user_id = auth.user_id,
        quote_id = id,
        line_item_id = item_id,
        "Line item updated"
    );

    Ok(Json(DataResponse { data: item }))
}

/// DELETE /admin/quotes/{id}/line-items/{item_id}
///
/// Delete a line item and recompute the quote total.
pub async fn delete_line_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let deleted = LineItemRepo::delete(&state.pool, id, item_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "QuoteLineItem",
            id: item_id,
        }));
    }

    QuoteRepo::recompute_total(&state.pool, id).await?;

    tracing::info!(
        user_id = auth.user_id,
        quote_id = id,
        line_item_id = item_id,
        "Line item deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Image Handlers
// ---------------------------------------------------------------------------

/// GET /admin/quotes/{id}/images
///
/// List a quote's images in display order.
pub async fn list_images(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_quote(&state, id).await?;
    let images = QuoteImageRepo::list_by_quote(&state.pool, id).await?;
    Ok(Json(DataResponse { data: images }))
}

/// POST /admin/quotes/{id}/images
///
/// Attach an image URL to a quote.
pub async fn create_image(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateQuoteImage>,
) -> AppResult<impl IntoResponse> {
    require_quote(&state, id).await?;

    if input.url.trim().is_empty() {
        return Err(AppError::BadRequest("url is required".into()));
    }

    let image = QuoteImageRepo::create(&state.pool, id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        quote_id = id,
        image_id = image.id,
        "Quote image attached"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: image })))
}

/// DELETE /admin/quotes/{id}/images/{image_id}
///
/// Detach an image from a quote.
pub async fn delete_image(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, image_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let deleted = QuoteImageRepo::delete(&state.pool, id, image_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "QuoteImage",
            id: image_id,
        }));
    }

    tracing::info!(
        user_id = auth.user_id,
        quote_id = id,
        image_id = image_id,
        "Quote image deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Analytics Reporting
// ---------------------------------------------------------------------------

/// GET /admin/quotes/{id}/analytics/events?limit=&offset=
///
/// List tracked events for a quote, newest first.
pub async fn list_quote_events(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<EventListParams>,
) -> AppResult<impl IntoResponse> {
    require_quote(&state, id).await?;

    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let events = AnalyticsRepo::list_events_by_quote(&state.pool, id, limit, offset).await?;

    Ok(Json(DataResponse { data: events }))
}
