/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler extracts the acting user and request data, checks that the
/// referenced rows exist and that the user may touch them, calls the
/// repository, and returns the response DTO as JSON.

mod user_handlers;
mod item_handlers;
mod booking_handlers;
mod request_handlers;

// Re-export all handlers
pub use user_handlers::*;
pub use item_handlers::*;
pub use booking_handlers::*;
pub use request_handlers::*;

use axum::Json;
use chrono::{NaiveDateTime, Utc};
use serde_json::{json, Value};

use crate::db::DbPool;
use crate::errors::ApiError;
use crate::models::{Booking, Item, ItemRequest, User};
use crate::repo;

/// Handler for `GET /health`
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// The instant time-based rules are evaluated at
pub(crate) fn current_time() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Loads a user or fails with 404
pub(crate) fn find_user(pool: &DbPool, user_id: i32) -> Result<User, ApiError> {
    repo::get_user(pool, user_id)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound(format!("User with id {} not found", user_id)))
}

/// Loads an item or fails with 404
pub(crate) fn find_item(pool: &DbPool, item_id: i32) -> Result<Item, ApiError> {
    repo::get_item(pool, item_id)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound(format!("Item with id {} not found", item_id)))
}

/// Loads a booking or fails with 404
pub(crate) fn find_booking(pool: &DbPool, booking_id: i32) -> Result<Booking, ApiError> {
    repo::get_booking(pool, booking_id)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound(format!("Booking with id {} not found", booking_id)))
}

/// Loads an item request or fails with 404
pub(crate) fn find_item_request(pool: &DbPool, request_id: i32) -> Result<ItemRequest, ApiError> {
    repo::get_item_request(pool, request_id)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound(format!("Item request with id {} not found", request_id)))
}
