//! HTTP-level integration tests for the staff `/admin/quotes` surface.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_auth, get, get_auth, post_auth, post_json_auth,
    put_json_auth, staff_token,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn quote_payload(title: &str) -> serde_json::Value {
    serde_json::json!({
        "customer_name": "Miriam Cho",
        "customer_email": "miriam@example.com",
        "title": title,
        "description": "South-facing exterior",
    })
}

/// Create a quote through the API and return its id as i64.
async fn create_quote(pool: &PgPool, token: &str, title: &str) -> i64 {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/admin/quotes",
        token,
        quote_payload(title),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Test: the admin surface requires a valid JWT
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_routes_require_auth(pool: PgPool) {
    let response = get(build_test_app(pool.clone()), "/api/v1/admin/quotes").await;
    common::assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;

    let response = get_auth(
        build_test_app(pool),
        "/api/v1/admin/quotes",
        "not-a-real-token",
    )
    .await;
    common::assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

// ---------------------------------------------------------------------------
// Test: create issues a quote number and magic token
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_issues_number_and_token(pool: PgPool) {
    let token = staff_token();
    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/admin/quotes",
        &token,
        quote_payload("Two-story exterior"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;

    assert_eq!(json["data"]["status"], "draft");
    let number = json["data"]["quote_number"].as_str().unwrap();
    assert!(number.starts_with("Q-"), "got quote number {number}");
    let magic = json["data"]["magic_token"].as_str().unwrap();
    assert_eq!(magic.len(), 32);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_missing_title(pool: PgPool) {
    let token = staff_token();
    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/admin/quotes",
        &token,
        serde_json::json!({
            "customer_name": "Miriam Cho",
            "customer_email": "miriam@example.com",
            "title": "  ",
        }),
    )
    .await;
    common::assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

// ---------------------------------------------------------------------------
// Test: list with status filter and pagination clamp
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_status(pool: PgPool) {
    let token = staff_token();
    let id = create_quote(&pool, &token, "Draft one").await;
    create_quote(&pool, &token, "Draft two").await;

    let response = post_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id}/send"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/admin/quotes?status=sent",
        &token,
    )
    .await;
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64().unwrap(), id);

    // Unknown status values are rejected, not silently ignored.
    let response = get_auth(
        build_test_app(pool),
        "/api/v1/admin/quotes?status=bogus",
        &token,
    )
    .await;
    common::assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

// ---------------------------------------------------------------------------
// Test: get detail includes items, images, and effective status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn detail_includes_items_and_images(pool: PgPool) {
    let token = staff_token();
    let id = create_quote(&pool, &token, "Detail check").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id}/line-items"),
        &token,
        serde_json::json!({
            "category": "labor",
            "description": "Prep and masking",
            "quantity": "8",
            "unit": "hour",
            "unit_price": "65"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id}/images"),
        &token,
        serde_json::json!({ "url": "https://cdn.example.com/site/1.jpg", "caption": "North wall" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(
        build_test_app(pool),
        &format!("/api/v1/admin/quotes/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["effective_status"], "draft");
    assert_eq!(json["data"]["line_items"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["images"].as_array().unwrap().len(), 1);

    let total: Decimal = json["data"]["total_amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(total, dec!(520));
}

// ---------------------------------------------------------------------------
// Test: update and delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn update_changes_fields(pool: PgPool) {
    let token = staff_token();
    let id = create_quote(&pool, &token, "Before rename").await;

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id}"),
        &token,
        serde_json::json!({ "title": "After rename" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "After rename");
    // Untouched fields survive the partial update.
    assert_eq!(json["data"]["customer_name"], "Miriam Cho");

    let response = put_json_auth(
        build_test_app(pool),
        "/api/v1/admin/quotes/999999",
        &token,
        serde_json::json!({ "title": "Ghost" }),
    )
    .await;
    common::assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_removes_quote(pool: PgPool) {
    let token = staff_token();
    let id = create_quote(&pool, &token, "Short-lived").await;

    let response = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        build_test_app(pool),
        &format!("/api/v1/admin/quotes/{id}"),
        &token,
    )
    .await;
    common::assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Test: send transitions once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn send_transitions_draft_only(pool: PgPool) {
    let token = staff_token();
    let id = create_quote(&pool, &token, "Send me").await;

    let response = post_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id}/send"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "sent");

    // A second send conflicts.
    let response = post_auth(
        build_test_app(pool),
        &format!("/api/v1/admin/quotes/{id}/send"),
        &token,
    )
    .await;
    common::assert_error(response, StatusCode::CONFLICT, "CONFLICT").await;
}

// ---------------------------------------------------------------------------
// Test: line item mutations keep the quote total in sync
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn line_item_mutations_recompute_total(pool: PgPool) {
    let token = staff_token();
    let id = create_quote(&pool, &token, "Totals").await;

    // 3 x 100 with 10% discount = 270.
    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id}/line-items"),
        &token,
        serde_json::json!({
            "category": "materials",
            "description": "Premium exterior paint",
            "quantity": "3",
            "unit": "gallon",
            "unit_price": "100",
            "discount_percent": "10"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let item_id = json["data"]["id"].as_i64().unwrap();
    let total: Decimal = json["data"]["total_price"].as_str().unwrap().parse().unwrap();
    assert_eq!(total, dec!(270));

    // Drop the discount: total becomes 300.
    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id}/line-items/{item_id}"),
        &token,
        serde_json::json!({ "discount_percent": "0" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id}"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let total: Decimal = json["data"]["total_amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(total, dec!(300));

    // Deleting the item zeroes the total.
    let response = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id}/line-items/{item_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        build_test_app(pool),
        &format!("/api/v1/admin/quotes/{id}"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let total: Decimal = json["data"]["total_amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(total, Decimal::ZERO);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn line_item_rejects_unknown_category(pool: PgPool) {
    let token = staff_token();
    let id = create_quote(&pool, &token, "Bad category").await;

    let response = post_json_auth(
        build_test_app(pool),
        &format!("/api/v1/admin/quotes/{id}/line-items"),
        &token,
        serde_json::json!({
            "category": "snacks",
            "description": "Crew lunch",
            "quantity": "1",
            "unit": "each",
            "unit_price": "40"
        }),
    )
    .await;
    common::assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

// ---------------------------------------------------------------------------
// Test: image delete is scoped to its quote
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn image_delete_is_quote_scoped(pool: PgPool) {
    let token = staff_token();
    let id_a = create_quote(&pool, &token, "Quote A").await;
    let id_b = create_quote(&pool, &token, "Quote B").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id_a}/images"),
        &token,
        serde_json::json!({ "url": "https://cdn.example.com/a.jpg" }),
    )
    .await;
    let json = body_json(response).await;
    let image_id = json["data"]["id"].as_i64().unwrap();

    // Deleting A's image through B misses.
    let response = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/quotes/{id_b}/images/{image_id}"),
        &token,
    )
    .await;
    common::assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;

    let response = delete_auth(
        build_test_app(pool),
        &format!("/api/v1/admin/quotes/{id_a}/images/{image_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Test: per-quote analytics events are listable
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn quote_events_list_is_empty_initially(pool: PgPool) {
    let token = staff_token();
    let id = create_quote(&pool, &token, "No traffic yet").await;

    let response = get_auth(
        build_test_app(pool),
        &format!("/api/v1/admin/quotes/{id}/analytics/events"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
