//! Common test utilities for ShareIt integration tests
//!
//! This file contains the test application setup and helpers that drive the
//! API the way a client would: every request goes through the router, and
//! only bookings in the past are seeded straight into the database.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDateTime, Timelike, Utc};
use serde_json::{json, Value};
use shareit::{
    create_app,
    db::{init_pool, DbPool},
    models::{Booking, BookingStatus, NewBooking},
    repo,
};
use std::sync::Arc;
use tower::ServiceExt;

/// The router together with the pool behind it
pub struct TestApp {
    pub router: Router,
    pub pool: Arc<DbPool>,
}

/// Creates a test application with its own in-memory SQLite database
///
/// A named shared-cache database is used so that every pooled connection
/// sees the migrated schema.
pub fn create_test_app() -> TestApp {
    let database_url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = Arc::new(init_pool(&database_url).unwrap());

    let conn = &mut pool.get().unwrap();
    shareit::run_migrations(conn).unwrap();

    TestApp {
        router: create_app(pool.clone()),
        pool,
    }
}

/// Sends a request and returns the status with the parsed JSON body
///
/// ### Arguments
///
/// * `app` - The test application
/// * `method` - The HTTP method
/// * `uri` - Path and query string
/// * `user` - Value for the `X-Sharer-User-Id` header, if any
/// * `body` - JSON body, if any
pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    user: Option<i32>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(user_id) = user {
        builder = builder.header("X-Sharer-User-Id", user_id.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Registers a user with an email derived from `name`, returning its ID
pub async fn create_user(app: &TestApp, name: &str) -> i32 {
    let body = json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
    });
    let (status, user) = send(app, "POST", "/users", None, Some(body)).await;
    assert_eq!(status, StatusCode::OK, "creating user failed: {}", user);
    user["id"].as_i64().unwrap() as i32
}

/// Lists an available item owned by `owner_id`, returning its ID
pub async fn create_item(app: &TestApp, owner_id: i32, name: &str, description: &str) -> i32 {
    let body = json!({
        "name": name,
        "description": description,
        "available": true,
    });
    let (status, item) = send(app, "POST", "/items", Some(owner_id), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "creating item failed: {}", item);
    item["id"].as_i64().unwrap() as i32
}

/// Books an item through the API for a range `hours` from now
pub async fn create_booking(
    app: &TestApp,
    booker_id: i32,
    item_id: i32,
    start_hours: i64,
    end_hours: i64,
) -> (StatusCode, Value) {
    let body = json!({
        "itemId": item_id,
        "start": from_now(start_hours),
        "end": from_now(end_hours),
    });
    send(app, "POST", "/bookings", Some(booker_id), Some(body)).await
}

/// A timestamp `hours` from now, formatted the way the API expects
pub fn from_now(hours: i64) -> String {
    (now() + Duration::hours(hours))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

fn now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Stores a booking directly, which is the only way to get one in the past
pub fn seed_booking(
    app: &TestApp,
    item_id: i32,
    booker_id: i32,
    start_hours: i64,
    end_hours: i64,
    status: BookingStatus,
) -> Booking {
    let now = now();
    let mut booking = NewBooking::waiting(
        item_id,
        booker_id,
        now + Duration::hours(start_hours),
        now + Duration::hours(end_hours),
    );
    booking.status = status;
    repo::create_booking(&app.pool, booking).unwrap()
}

/// Collects the `id` field of every element of a JSON array
pub fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect()
}
