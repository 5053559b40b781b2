//! Shared helpers for API integration tests.
//!
//! Builds the real application router (same middleware stack as `main.rs`)
//! on top of a `#[sqlx::test]` pool and provides small request helpers
//! around `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use ridgeline_api::auth::jwt::{generate_access_token, JwtConfig};
use ridgeline_api::config::ServerConfig;
use ridgeline_api::handlers::public_quotes::RESPONSE_DEDUP_TTL_SECS;
use ridgeline_api::router::build_app_router;
use ridgeline_api::state::AppState;
use ridgeline_core::dedup::PendingDedup;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pending: Arc::new(Mutex::new(PendingDedup::new(
            chrono::Duration::seconds(RESPONSE_DEDUP_TTL_SECS),
        ))),
    };
    build_app_router(state, &config)
}

/// Mint a staff access token for the admin surface.
pub fn staff_token() -> String {
    generate_access_token(1, "admin", &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, path: &str) -> Response {
    send(app, Method::GET, path, None, None).await
}

pub async fn get_auth(app: Router, path: &str, token: &str) -> Response {
    send(app, Method::GET, path, Some(token), None).await
}

pub async fn post_json(app: Router, path: &str, json: serde_json::Value) -> Response {
    send(app, Method::POST, path, None, Some(json)).await
}

pub async fn post_json_auth(
    app: Router,
    path: &str,
    token: &str,
    json: serde_json::Value,
) -> Response {
    send(app, Method::POST, path, Some(token), Some(json)).await
}

pub async fn post_auth(app: Router, path: &str, token: &str) -> Response {
    send(app, Method::POST, path, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    path: &str,
    token: &str,
    json: serde_json::Value,
) -> Response {
    send(app, Method::PUT, path, Some(token), Some(json)).await
}

pub async fn patch_json(app: Router, path: &str, json: serde_json::Value) -> Response {
    send(app, Method::PATCH, path, None, Some(json)).await
}

pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response {
    send(app, Method::DELETE, path, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the standard error envelope: `{ "error": ..., "code": ... }`.
pub async fn assert_error(response: Response, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
}
