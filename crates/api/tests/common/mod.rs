//! Shared test harness.
//!
//! [`build_test_app`] mirrors the router construction in `main.rs` via
//! [`build_app_router`], so integration tests exercise the same
//! middleware stack (CORS, request ID, timeout, tracing, panic
//! recovery) that production uses. Tokens are minted locally with the
//! test secret; there is no identity provider in the loop.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use tower::ServiceExt;

use unajmi_api::auth::jwt::{Claims, JwtConfig};
use unajmi_api::config::ServerConfig;
use unajmi_api::router::build_app_router;
use unajmi_api::state::AppState;
use unajmi_api::storage::LocalMediaStore;
use unajmi_core::clock::{Clock, SystemClock};
use unajmi_db::repositories::profile_repo::ProfileRepo;
use unajmi_events::Notifier;

pub const TEST_JWT_SECRET: &str = "test-secret";

/// Build a test `ServerConfig` with safe defaults. The database URL is
/// never used; `sqlx::test` hands us a ready pool.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        database_max_connections: 5,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_grace_secs: 5,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
    }
}

/// Application state over the given pool, with email delivery disabled
/// and media writes pointed at a temp directory.
pub fn test_state(pool: PgPool) -> AppState {
    test_state_with_clock(pool, Arc::new(SystemClock))
}

/// Same as [`test_state`], with an injected clock for tests that move
/// time.
pub fn test_state_with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> AppState {
    let config = test_config();
    let media = LocalMediaStore::new(
        std::env::temp_dir().join("unajmi-test-media"),
        "/media".to_string(),
    );
    AppState::new(
        pool.clone(),
        Arc::new(config),
        Arc::new(Notifier::new(pool, None)),
        Arc::new(media),
        clock,
    )
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = test_state(pool);
    let config = test_config();
    build_app_router(state, &config)
}

pub fn build_test_app_with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Router {
    let state = test_state_with_clock(pool, clock);
    let config = test_config();
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Mint an HS256 token for `user_id`, valid for an hour.
pub fn mint_token(user_id: &str) -> String {
    mint_token_with(user_id, None, None)
}

pub fn mint_token_with(user_id: &str, email: Option<&str>, name: Option<&str>) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.map(str::to_string),
        name: name.map(str::to_string),
        iat: now,
        exp: now + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token encoding should succeed")
}

/// Provision a profile for `user_id` and flip its superadmin flag.
pub async fn make_superadmin(pool: &PgPool, user_id: &str) {
    ProfileRepo::ensure(pool, user_id, None, None)
        .await
        .expect("profile provisioning should succeed");
    sqlx::query("UPDATE profiles SET is_superadmin = TRUE WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .expect("superadmin flag update should succeed");
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("request should produce a response")
}

pub async fn get(app: &Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, path: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: &Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST with an empty body; the booking lifecycle actions take none.
pub async fn post_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: &Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_bytes_auth(
    app: &Router,
    path: &str,
    token: &str,
    bytes: Vec<u8>,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/octet-stream")
        .body(Body::from(bytes))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes: Bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Domain helpers
// ---------------------------------------------------------------------------

/// A date `n` days from today, for booking windows that must sit in the
/// future regardless of when the suite runs.
pub fn days_from_today(n: i64) -> NaiveDate {
    chrono::Utc::now().date_naive() + chrono::Duration::days(n)
}

/// Create a listing over the API and return its id.
pub async fn create_test_item(app: &Router, token: &str, title: &str) -> String {
    let body = serde_json::json!({
        "title": title,
        "description": "Well looked after, works fine",
        "category": "tools",
        "price_per_day_cents": 500,
        "deposit_cents": 2000,
        "delivery_methods": ["pickup"],
    });
    let response = post_json_auth(app, "/api/v1/items", token, body).await;
    assert_eq!(
        response.status(),
        axum::http::StatusCode::CREATED,
        "item creation should succeed"
    );
    let json = body_json(response).await;
    json["data"]["id"]
        .as_str()
        .expect("created item has an id")
        .to_string()
}

/// Create a booking over the API and return its id. Dates are relative
/// to today.
pub async fn create_test_booking(
    app: &Router,
    token: &str,
    item_id: &str,
    start_in_days: i64,
    end_in_days: i64,
) -> String {
    let body = serde_json::json!({
        "item_id": item_id,
        "start_date": days_from_today(start_in_days),
        "end_date": days_from_today(end_in_days),
        "delivery_method": "pickup",
    });
    let response = post_json_auth(app, "/api/v1/bookings", token, body).await;
    assert_eq!(
        response.status(),
        axum::http::StatusCode::CREATED,
        "booking creation should succeed"
    );
    let json = body_json(response).await;
    json["data"]["id"]
        .as_str()
        .expect("created booking has an id")
        .to_string()
}
