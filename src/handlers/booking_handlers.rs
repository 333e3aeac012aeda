use axum::{extract::State, Json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{instrument, debug, info, warn};

use crate::db::DbPool;
use crate::dto::{ApprovalQuery, BookingDto, BookingState, BookingStateQuery, CreateBookingDto};
use crate::errors::ApiError;
use crate::extract::{Path, SharerId, ValidatedJson, ValidatedQuery};
use crate::models::{Booking, BookingStatus, NewBooking};
use crate::repo;

use super::{current_time, find_booking, find_item, find_user};

/// Expands bookings with their bookers and items, keeping their order
fn booking_dtos(pool: &DbPool, bookings: Vec<Booking>) -> Result<Vec<BookingDto>, ApiError> {
    let mut booker_ids: Vec<i32> = bookings.iter().map(|b| b.get_booker_id()).collect();
    booker_ids.sort_unstable();
    booker_ids.dedup();
    let mut item_ids: Vec<i32> = bookings.iter().map(|b| b.get_item_id()).collect();
    item_ids.sort_unstable();
    item_ids.dedup();

    let bookers: HashMap<i32, _> = repo::get_users(pool, &booker_ids)
        .map_err(ApiError::Database)?
        .into_iter()
        .map(|user| (user.get_id(), user))
        .collect();
    let items: HashMap<i32, _> = repo::get_items(pool, &item_ids)
        .map_err(ApiError::Database)?
        .into_iter()
        .map(|item| (item.get_id(), item))
        .collect();

    bookings
        .iter()
        .map(|booking| {
            let booker = bookers.get(&booking.get_booker_id()).cloned().ok_or_else(|| {
                ApiError::Database(anyhow::anyhow!("Booker {} of booking {} is missing", booking.get_booker_id(), booking.get_id()))
            })?;
            let item = items.get(&booking.get_item_id()).cloned().ok_or_else(|| {
                ApiError::Database(anyhow::anyhow!("Item {} of booking {} is missing", booking.get_item_id(), booking.get_id()))
            })?;
            Ok(BookingDto::new(booking, booker, item))
        })
        .collect()
}

/// Resolves the `state` query parameter, rejecting unknown values
fn parse_state(query: &BookingStateQuery) -> Result<BookingState, ApiError> {
    query.parse().map_err(ApiError::UnknownState)
}

/// Handler for booking an item
///
/// This function handles POST requests to `/bookings`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `booker_id` - The acting user, who makes the booking
/// * `payload` - The item and date range, already checked against the clock
///
/// ### Returns
///
/// The new booking, waiting for the owner's decision
#[instrument(skip(pool, payload), fields(booker_id = %booker_id, item_id = %payload.item_id))]
pub async fn create_booking_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(booker_id): SharerId,
    ValidatedJson(payload): ValidatedJson<CreateBookingDto>,
) -> Result<Json<BookingDto>, ApiError> {
    info!("Creating new booking");

    let item = find_item(&pool, payload.item_id)?;
    let booker = find_user(&pool, booker_id)?;

    if !item.is_available() {
        return Err(ApiError::Validation(format!("Item {} is not available for booking", item.get_id())));
    }
    if item.is_owned_by(booker_id) {
        return Err(ApiError::NotFound(format!("Item {} cannot be booked by its owner", item.get_id())));
    }

    let booking = repo::create_booking(
        &pool,
        NewBooking::waiting(item.get_id(), booker_id, payload.start, payload.end),
    )
    .map_err(ApiError::Database)?;

    info!("Successfully created booking with id: {}", booking.get_id());

    Ok(Json(BookingDto::new(&booking, booker, item)))
}

/// Handler for approving or rejecting a booking
///
/// This function handles PATCH requests to `/bookings/{id}?approved=...`.
/// Only the owner of the booked item may decide, and an approved booking
/// cannot be decided again.
#[instrument(skip(pool, query), fields(owner_id = %owner_id, booking_id = %booking_id, approved = %query.approved))]
pub async fn approve_booking_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(owner_id): SharerId,
    Path(booking_id): Path<i32>,
    ValidatedQuery(query): ValidatedQuery<ApprovalQuery>,
) -> Result<Json<BookingDto>, ApiError> {
    info!("Deciding booking");

    let booking = find_booking(&pool, booking_id)?;
    let item = find_item(&pool, booking.get_item_id())?;
    if !item.is_owned_by(owner_id) {
        return Err(ApiError::AccessDenied(format!("User {} does not own the booked item", owner_id)));
    }
    find_user(&pool, owner_id)?;

    if booking.get_status() == BookingStatus::Approved {
        warn!("Booking already approved");
        return Err(ApiError::Validation(format!("Booking {} is already approved", booking_id)));
    }

    let status = if query.approved { BookingStatus::Approved } else { BookingStatus::Rejected };
    let booking = repo::set_booking_status(&pool, booking_id, status).map_err(ApiError::Database)?;
    let booker = find_user(&pool, booking.get_booker_id())?;

    info!("Booking {} is now {}", booking_id, status);

    Ok(Json(BookingDto::new(&booking, booker, item)))
}

/// Handler for retrieving a specific booking
///
/// This function handles GET requests to `/bookings/{id}`. Only the booker
/// and the item owner can see a booking; anyone else gets 404.
#[instrument(skip(pool), fields(user_id = %user_id, booking_id = %booking_id))]
pub async fn get_booking_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(user_id): SharerId,
    Path(booking_id): Path<i32>,
) -> Result<Json<BookingDto>, ApiError> {
    debug!("Retrieving booking");

    find_user(&pool, user_id)?;
    let booking = find_booking(&pool, booking_id)?;
    let item = find_item(&pool, booking.get_item_id())?;

    if !booking.is_booked_by(user_id) && !item.is_owned_by(user_id) {
        return Err(ApiError::NotFound(format!("Booking with id {} not found for user {}", booking_id, user_id)));
    }

    let booker = find_user(&pool, booking.get_booker_id())?;

    Ok(Json(BookingDto::new(&booking, booker, item)))
}

/// Handler for listing the acting user's own bookings
///
/// This function handles GET requests to `/bookings?state=...`.
#[instrument(skip(pool, query), fields(booker_id = %booker_id))]
pub async fn list_bookings_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(booker_id): SharerId,
    ValidatedQuery(query): ValidatedQuery<BookingStateQuery>,
) -> Result<Json<Vec<BookingDto>>, ApiError> {
    debug!("Listing bookings of booker");

    find_user(&pool, booker_id)?;
    let state = parse_state(&query)?;

    let bookings = repo::list_bookings_by_booker(&pool, booker_id, state, current_time())
        .map_err(ApiError::Database)?;
    let dtos = booking_dtos(&pool, bookings)?;

    info!("Retrieved {} {} bookings", dtos.len(), state);

    Ok(Json(dtos))
}

/// Handler for listing the bookings of the acting user's items
///
/// This function handles GET requests to `/bookings/owner?state=...`.
#[instrument(skip(pool, query), fields(owner_id = %owner_id))]
pub async fn list_owner_bookings_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(owner_id): SharerId,
    ValidatedQuery(query): ValidatedQuery<BookingStateQuery>,
) -> Result<Json<Vec<BookingDto>>, ApiError> {
    debug!("Listing bookings of owner's items");

    find_user(&pool, owner_id)?;
    let state = parse_state(&query)?;

    let bookings = repo::list_bookings_by_owner(&pool, owner_id, state, current_time())
        .map_err(ApiError::Database)?;
    let dtos = booking_dtos(&pool, bookings)?;

    info!("Retrieved {} {} bookings", dtos.len(), state);

    Ok(Json(dtos))
}
