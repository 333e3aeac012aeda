use axum::{extract::State, Json};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::db::DbPool;
use crate::dto::{CreateUserDto, UpdateUserDto};
use crate::errors::ApiError;
use crate::extract::{Path, ValidatedJson};
use crate::models::{NewUser, User};
use crate::repo;

use super::find_user;

/// Maps a unique-constraint failure on insert or update to a 409
///
/// The constraint on `users.email` can still fire after `email_taken` passed
/// when two requests race for the same address.
fn email_write_error(err: anyhow::Error, email: &str) -> ApiError {
    match err.downcast_ref::<DieselError>() {
        Some(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            ApiError::Conflict(format!("Email {} is already in use", email))
        }
        _ => ApiError::Database(err),
    }
}

/// Handler for registering a new user
///
/// This function handles POST requests to `/users`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `payload` - The validated name and email
///
/// ### Returns
///
/// The newly created user as JSON, or 409 if the email is already in use
#[instrument(skip(pool, payload), fields(email = %payload.email))]
pub async fn create_user_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedJson(payload): ValidatedJson<CreateUserDto>,
) -> Result<Json<User>, ApiError> {
    info!("Creating new user");

    if repo::email_taken(&pool, &payload.email, None).map_err(ApiError::Database)? {
        return Err(ApiError::Conflict(format!("Email {} is already in use", payload.email)));
    }

    let user = repo::create_user(&pool, NewUser::new(payload.name, payload.email.clone()))
        .map_err(|err| email_write_error(err, &payload.email))?;

    info!("Successfully created user with id: {}", user.get_id());

    Ok(Json(user))
}

/// Handler for listing all users
///
/// This function handles GET requests to `/users`.
#[instrument(skip(pool))]
pub async fn list_users_handler(
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<User>>, ApiError> {
    debug!("Listing all users");

    let users = repo::list_users(&pool).map_err(ApiError::Database)?;

    info!("Retrieved {} users", users.len());

    Ok(Json(users))
}

/// Handler for retrieving a specific user
///
/// This function handles GET requests to `/users/{id}`.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub async fn get_user_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<i32>,
) -> Result<Json<User>, ApiError> {
    debug!("Retrieving user");

    let user = find_user(&pool, user_id)?;

    Ok(Json(user))
}

/// Handler for partially updating a user
///
/// This function handles PATCH requests to `/users/{id}`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user_id` - The ID of the user to update, extracted from the URL path
/// * `payload` - The fields to change; absent fields are kept
///
/// ### Returns
///
/// The updated user as JSON
#[instrument(skip(pool, payload), fields(user_id = %user_id))]
pub async fn update_user_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateUserDto>,
) -> Result<Json<User>, ApiError> {
    info!("Updating user");

    find_user(&pool, user_id)?;

    if let Some(email) = &payload.email {
        if repo::email_taken(&pool, email, Some(user_id)).map_err(ApiError::Database)? {
            return Err(ApiError::Conflict(format!("Email {} is already in use", email)));
        }
    }

    let email = payload.email.clone().unwrap_or_default();
    let user = repo::update_user(&pool, user_id, payload.name, payload.email)
        .map_err(|err| email_write_error(err, &email))?;

    info!("Successfully updated user with id: {}", user.get_id());

    Ok(Json(user))
}

/// Handler for deleting a user
///
/// This function handles DELETE requests to `/users/{id}`.
///
/// ### Returns
///
/// The user as it was before deletion
#[instrument(skip(pool), fields(user_id = %user_id))]
pub async fn delete_user_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<i32>,
) -> Result<Json<User>, ApiError> {
    info!("Deleting user");

    let user = find_user(&pool, user_id)?;

    repo::delete_user(&pool, user_id).map_err(ApiError::Database)?;

    info!("Successfully deleted user with id: {}", user_id);

    Ok(Json(user))
}
