/// ShareIt: A Peer-to-Peer Item Rental Library
///
/// This library provides the core functionality for an item rental service:
/// users list items, book each other's items for a date range, comment on
/// items they have rented, and post requests for items nobody offers yet.
///
/// ### Modules
///
/// - `db`: Database connection management
/// - `models`: Rows of the users, items, bookings, requests and comments tables
/// - `repo`: Repository layer for database operations
/// - `dto`: Request bodies, query strings and response shapes
/// - `extract`: Request extractors for the acting user and validated input
/// - `handlers`: The HTTP handlers
/// - `config`: Layered configuration for the binaries
/// - `schema`: Database schema definitions
///
/// ### Web API
///
/// The acting user is identified by the `X-Sharer-User-Id` header.
///
/// - `POST /users`, `GET /users`, `GET|PATCH|DELETE /users/{id}`
/// - `POST /items`, `GET /items`, `GET /items/search?text=`
/// - `GET|PATCH|DELETE /items/{id}`, `POST /items/{id}/comment`
/// - `POST /bookings`, `GET /bookings?state=`, `GET /bookings/owner?state=`
/// - `GET /bookings/{id}`, `PATCH /bookings/{id}?approved=`
/// - `POST /requests`, `GET /requests`, `GET /requests/all?from=&size=`
/// - `GET /requests/{id}`
/// - `GET /health`

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects
pub mod dto;

/// API error type
pub mod errors;

/// Request extractors
pub mod extract;

/// HTTP handlers
pub mod handlers;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

#[cfg(test)]
pub mod test_utils;

use axum::{
    routing::{get, post},
    Router,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use handlers::*;

/// The SQL migrations under `migrations/`, compiled into the binary
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates the application router with all routes configured
///
/// ### Arguments
///
/// * `pool` - The database connection pool to be shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes and the database pool as state
pub fn create_app(pool: Arc<db::DbPool>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Users
        .route("/users", post(create_user_handler).get(list_users_handler))
        .route(
            "/users/{id}",
            get(get_user_handler).patch(update_user_handler).delete(delete_user_handler),
        )
        // Items and comments
        .route("/items", post(create_item_handler).get(list_items_handler))
        .route("/items/search", get(search_items_handler))
        .route(
            "/items/{id}",
            get(get_item_handler).patch(update_item_handler).delete(delete_item_handler),
        )
        .route("/items/{id}/comment", post(add_comment_handler))
        // Bookings
        .route("/bookings", post(create_booking_handler).get(list_bookings_handler))
        .route("/bookings/owner", get(list_owner_bookings_handler))
        .route("/bookings/{id}", get(get_booking_handler).patch(approve_booking_handler))
        // Item requests
        .route("/requests", post(create_request_handler).get(list_own_requests_handler))
        .route("/requests/all", get(list_other_requests_handler))
        .route("/requests/{id}", get(get_request_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(pool)
}

/// Runs the embedded migrations
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Errors
///
/// Returns an error if any pending migration fails to apply
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    tracing::info!("Applied {} pending migrations", applied.len());

    Ok(())
}
