//! Handlers for the customer-facing quote gateway.
//!
//! These endpoints authenticate by the magic token carried in the URL path;
//! there is no account or login. Every lookup failure collapses into the
//! same "Quote not found" response so tokens cannot be probed, and the
//! first authenticated fetch of a sent quote stamps `viewed_at`.
//!
//! The wire format here is camelCase, matching the quote page client. The
//! staff surface in [`super::quotes`] keeps the snake_case of the rows.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use ridgeline_core::error::CoreError;
use ridgeline_core::line_items::{line_item_total, validate_customer_category, validate_pricing};
use ridgeline_core::quote_status::{effective_status, CustomerResponse, QuoteStatus};
use ridgeline_core::quotes::{validate_color_selections, validate_customer_notes};
use ridgeline_core::types::Timestamp;
use ridgeline_db::models::line_item::{CreatePublicLineItem, QuoteLineItem};
use ridgeline_db::models::quote::{Quote, SubmitColors, SubmitResponse};
use ridgeline_db::models::quote_image::QuoteImage;
use ridgeline_db::repositories::{LineItemRepo, NewLineItem, QuoteImageRepo, QuoteRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// The quote as the customer sees it.
///
/// Internal ids and the magic token itself are not echoed back; the status
/// is always the effective (lazily-expired) one.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuote {
    pub quote_number: String,
    pub status: String,
    pub customer_name: String,
    pub title: String,
    pub description: Option<String>,
    pub total_amount: Decimal,
    pub valid_until: Option<Timestamp>,
    pub viewed_at: Option<Timestamp>,
    pub responded_at: Option<Timestamp>,
    pub customer_response: Option<String>,
    pub customer_notes: Option<String>,
    pub paint_colors: serde_json::Value,
    pub line_items: Vec<PublicLineItem>,
    pub images: Vec<PublicImage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicLineItem {
    pub category: String,
    pub description: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    pub total_price: Decimal,
    pub customer_added: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicImage {
    pub url: String,
    pub caption: Option<String>,
    pub sort_order: i32,
}

impl From<QuoteLineItem> for PublicLineItem {
    fn from(item: QuoteLineItem) -> Self {
        Self {
            category: item.category,
            description: item.description,
            quantity: item.quantity,
            unit: item.unit,
            unit_price: item.unit_price,
            discount_percent: item.discount_percent,
            total_price: item.total_price,
            customer_added: item.customer_added,
        }
    }
}

impl From<QuoteImage> for PublicImage {
    fn from(image: QuoteImage) -> Self {
        Self {
            url: image.url,
            caption: image.caption,
            sort_order: image.sort_order,
        }
    }
}

fn public_view(
    quote: Quote,
    effective: QuoteStatus,
    line_items: Vec<QuoteLineItem>,
    images: Vec<QuoteImage>,
) -> PublicQuote {
    PublicQuote {
        quote_number: quote.quote_number,
        status: effective.as_str().to_string(),
        customer_name: quote.customer_name,
        title: quote.title,
        description: quote.description,
        total_amount: quote.total_amount,
        valid_until: quote.valid_until,
        viewed_at: quote.viewed_at,
        responded_at: quote.responded_at,
        customer_response: quote.customer_response,
        customer_notes: quote.customer_notes,
        paint_colors: quote.paint_colors,
        line_items: line_items.into_iter().map(Into::into).collect(),
        images: images.into_iter().map(Into::into).collect(),
    }
}

/// How long a response submission holds its dedup slot.
///
/// Long enough to cover the database round trip; short enough that a
/// crashed request does not lock the customer out.
pub const RESPONSE_DEDUP_TTL_SECS: i64 = 10;

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

/// Look up a quote by token, mapping a miss to the uniform 404.
async fn find_quote(state: &AppState, token: &str) -> AppResult<Quote> {
    QuoteRepo::find_by_token(&state.pool, token)
        .await?
        .ok_or(AppError::QuoteNotFound)
}

/// Admit a response submission into the dedup map, or conflict.
fn begin_pending(state: &AppState, signature: &str) -> AppResult<()> {
    let mut pending = state
        .pending
        .lock()
        .map_err(|_| AppError::InternalError("dedup lock poisoned".into()))?;
    if pending.begin(signature, Utc::now()) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Conflict(
            "an identical response is already being processed".into(),
        )))
    }
}

/// Release a dedup slot. A poisoned lock is ignored; the entry expires on
/// its own TTL.
fn finish_pending(state: &AppState, signature: &str) {
    if let Ok(mut pending) = state.pending.lock() {
        pending.finish(signature);
    }
}

/// Validate the state machine and record the customer's response.
async fn apply_response(
    state: &AppState,
    token: &str,
    response: CustomerResponse,
    notes: Option<&str>,
) -> AppResult<Quote> {
    let quote = find_quote(state, token).await?;
    let effective = require_open(&quote)?;

    if !effective.can_transition_to(response.target_status()) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "quote must be viewed before responding; current status is '{}'",
            effective.as_str()
        ))));
    }

    QuoteRepo::record_response(&state.pool, token, response.as_str(), notes, Utc::now())
        .await?
        // Lost the race against a concurrent response or the deadline.
        .ok_or(AppError::Core(CoreError::Conflict(
            "quote response was already recorded".into(),
        )))
}

/// Derive the effective status and reject when it is terminal.
fn require_open(quote: &Quote) -> AppResult<QuoteStatus> {
    let stored = super::stored_status(quote)?;
    let effective = effective_status(stored, quote.valid_until, Utc::now());

    match effective {
        QuoteStatus::Expired => Err(AppError::Core(CoreError::Conflict(
            "quote has expired".into(),
        ))),
        s if s.is_terminal() => Err(AppError::Core(CoreError::Conflict(format!(
            "quote has already been {}",
            s.as_str()
        )))),
        s => Ok(s),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /quotes/{token}
///
/// Fetch a quote by its magic token. The first fetch of a `sent` quote
/// transitions it to `viewed` and stamps `viewed_at`; concurrent or
/// repeated fetches leave the stamp untouched.
pub async fn get_quote(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let quote = match QuoteRepo::mark_viewed(&state.pool, &token).await? {
        Some(quote) => {
            tracing::info!(
                quote_id = quote.id,
                quote_number = %quote.quote_number,
                "Quote viewed for the first time"
            );
            quote
        }
        None => find_quote(&state, &token).await?,
    };

    let stored = super::stored_status(&quote)?;
    let effective = effective_status(stored, quote.valid_until, Utc::now());

    let line_items = LineItemRepo::list_by_quote(&state.pool, quote.id).await?;
    let images = QuoteImageRepo::list_by_quote(&state.pool, quote.id).await?;

    Ok(Json(DataResponse {
        data: public_view(quote, effective, line_items, images),
    }))
}

/// POST /quotes/{token}/respond
///
/// Record the customer's accept/decline decision. The transition is final:
/// a quote that has already been answered, or whose deadline has passed,
/// conflicts.
pub async fn respond(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<SubmitResponse>,
) -> AppResult<impl IntoResponse> {
    let response = CustomerResponse::parse(&input.response)?;
    if let Some(ref notes) = input.notes {
        validate_customer_notes(notes)?;
    }

    // Collapse double-submits (double click, client retry) before touching
    // the database. The conditional UPDATE below still decides the winner
    // when two distinct processes race.
    let signature = format!("respond:{token}");
    begin_pending(&state, &signature)?;
    let outcome = apply_response(&state, &token, response, input.notes.as_deref()).await;
    finish_pending(&state, &signature);
    let updated = outcome?;

    tracing::info!(
        quote_id = updated.id,
        quote_number = %updated.quote_number,
        response = response.as_str(),
        "Customer responded to quote"
    );

    let stored = super::stored_status(&updated)?;
    let line_items = LineItemRepo::list_by_quote(&state.pool, updated.id).await?;
    let images = QuoteImageRepo::list_by_quote(&state.pool, updated.id).await?;

    Ok(Json(DataResponse {
        data: public_view(updated, stored, line_items, images),
    }))
}

/// POST /quotes/{token}/colors
///
/// Merge the customer's color selections into the quote. Allowed any time
/// before the quote reaches a terminal state; never changes the status.
pub async fn select_colors(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<SubmitColors>,
) -> AppResult<impl IntoResponse> {
    validate_color_selections(&input.paint_colors)?;

    let quote = find_quote(&state, &token).await?;
    require_open(&quote)?;

    let colors = serde_json::to_value(&input.paint_colors)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let updated = QuoteRepo::merge_colors(&state.pool, &token, &colors)
        .await?
        .ok_or(AppError::Core(CoreError::Conflict(
            "quote can no longer be updated".into(),
        )))?;

    tracing::info!(
        quote_id = updated.id,
        selections = input.paint_colors.len(),
        "Customer color selections merged"
    );

    let stored = super::stored_status(&updated)?;
    let effective = effective_status(stored, updated.valid_until, Utc::now());
    let line_items = LineItemRepo::list_by_quote(&state.pool, updated.id).await?;
    let images = QuoteImageRepo::list_by_quote(&state.pool, updated.id).await?;

    Ok(Json(DataResponse {
        data: public_view(updated, effective, line_items, images),
    }))
}

/// POST /quotes/public/{token}/line-items
///
/// Let the customer add an item to their own quote. Only the `additional`
/// and `upgrade` categories are open to customers; the quote total is
/// recomputed after the insert.
pub async fn add_line_item(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<CreatePublicLineItem>,
) -> AppResult<impl IntoResponse> {
    let quote = find_quote(&state, &token).await?;
    require_open(&quote)?;

    validate_customer_category(&input.category)?;
    let discount = input.discount_percent.unwrap_or(Decimal::ZERO);
    validate_pricing(input.quantity, input.unit_price, discount)?;

    let item = LineItemRepo::create(
        &state.pool,
        quote.id,
        &NewLineItem {
            category: &input.category,
            description: &input.description,
            quantity: input.quantity,
            unit: &input.unit,
            unit_price: input.unit_price,
            discount_percent: discount,
            total_price: line_item_total(input.quantity, input.unit_price, discount),
            customer_added: true,
        },
    )
    .await?;

    QuoteRepo::recompute_total(&state.pool, quote.id).await?;

    tracing::info!(
        quote_id = quote.id,
        line_item_id = item.id,
        category = %item.category,
        "Customer added line item"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PublicLineItem::from(item),
        }),
    ))
}
