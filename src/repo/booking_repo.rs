use crate::db::DbPool;
use crate::dto::BookingState;
use crate::models::{Booking, BookingStatus, NewBooking};
use crate::schema::{bookings, items};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Creates a new booking in the database
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `new_booking` - The booking to insert
///
/// ### Returns
///
/// A Result containing the stored Booking, with its assigned ID
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The item or booker does not exist
/// - The start is not before the end
#[instrument(skip(pool, new_booking), fields(item_id = %new_booking.item_id, booker_id = %new_booking.booker_id))]
pub fn create_booking(pool: &DbPool, new_booking: NewBooking) -> Result<Booking> {
    debug!("Creating new booking");

    let conn = &mut pool.get()?;

    let booking = diesel::insert_into(bookings::table)
        .values(&new_booking)
        .returning(Booking::as_returning())
        .get_result(conn)?;

    info!("Successfully created booking with id: {}", booking.get_id());

    Ok(booking)
}

/// Retrieves a booking by ID
#[instrument(skip(pool), fields(booking_id = %booking_id))]
pub fn get_booking(pool: &DbPool, booking_id: i32) -> Result<Option<Booking>> {
    debug!("Retrieving booking by id");

    let conn = &mut pool.get()?;

    let result = bookings::table
        .find(booking_id)
        .select(Booking::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Sets the status of a booking
///
/// ### Errors
///
/// Returns an error if the booking does not exist or the update fails.
#[instrument(skip(pool), fields(booking_id = %booking_id, status = %status))]
pub fn set_booking_status(pool: &DbPool, booking_id: i32, status: BookingStatus) -> Result<Booking> {
    debug!("Updating booking status");

    let conn = &mut pool.get()?;

    let booking = diesel::update(bookings::table.find(booking_id))
        .set(bookings::status.eq(status))
        .returning(Booking::as_returning())
        .get_result(conn)?;

    info!("Booking is now {}", booking.get_status());

    Ok(booking)
}

/// Narrows a booking query to one state and orders it
///
/// Current bookings are listed soonest-started first; every other state
/// lists the latest start first.
fn filter_by_state<'a>(
    query: bookings::BoxedQuery<'a, Sqlite>,
    state: BookingState,
    now: NaiveDateTime,
) -> bookings::BoxedQuery<'a, Sqlite> {
    match state {
        BookingState::All => query.order(bookings::start_date.desc()),
        BookingState::Current => query
            .filter(bookings::start_date.lt(now))
            .filter(bookings::end_date.gt(now))
            .order(bookings::start_date.asc()),
        BookingState::Past => query
            .filter(bookings::end_date.lt(now))
            .order(bookings::start_date.desc()),
        BookingState::Future => query
            .filter(bookings::start_date.gt(now))
            .order(bookings::start_date.desc()),
        BookingState::Waiting => query
            .filter(bookings::status.eq(BookingStatus::Waiting))
            .order(bookings::start_date.desc()),
        BookingState::Rejected => query
            .filter(bookings::status.eq(BookingStatus::Rejected))
            .order(bookings::start_date.desc()),
    }
}

/// Lists the bookings made by a user in the given state
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `booker_id` - The user who made the bookings
/// * `state` - Which bookings to include
/// * `now` - The instant the time-based states are evaluated at
#[instrument(skip(pool), fields(booker_id = %booker_id, state = %state))]
pub fn list_bookings_by_booker(
    pool: &DbPool,
    booker_id: i32,
    state: BookingState,
    now: NaiveDateTime,
) -> Result<Vec<Booking>> {
    debug!("Listing bookings by booker");

    let conn = &mut pool.get()?;

    let query = bookings::table
        .filter(bookings::booker_id.eq(booker_id))
        .into_boxed();

    let result = filter_by_state(query, state, now)
        .select(Booking::as_select())
        .load(conn)?;

    info!("Retrieved {} bookings", result.len());

    Ok(result)
}

/// Lists the bookings of every item a user owns in the given state
#[instrument(skip(pool), fields(owner_id = %owner_id, state = %state))]
pub fn list_bookings_by_owner(
    pool: &DbPool,
    owner_id: i32,
    state: BookingState,
    now: NaiveDateTime,
) -> Result<Vec<Booking>> {
    debug!("Listing bookings by item owner");

    let conn = &mut pool.get()?;

    let owned_items = items::table
        .filter(items::owner_id.eq(owner_id))
        .select(items::id);

    let query = bookings::table
        .filter(bookings::item_id.eq_any(owned_items))
        .into_boxed();

    let result = filter_by_state(query, state, now)
        .select(Booking::as_select())
        .load(conn)?;

    info!("Retrieved {} bookings", result.len());

    Ok(result)
}

/// Finds the approved bookings of an item either side of `now`
///
/// ### Returns
///
/// A pair of the latest approved booking that started before `now` and the
/// earliest approved booking that starts after it
#[instrument(skip(pool), fields(item_id = %item_id))]
pub fn neighbouring_bookings(
    pool: &DbPool,
    item_id: i32,
    now: NaiveDateTime,
) -> Result<(Option<Booking>, Option<Booking>)> {
    let conn = &mut pool.get()?;

    let approved = bookings::table
        .filter(bookings::item_id.eq(item_id))
        .filter(bookings::status.eq(BookingStatus::Approved));

    let last = approved
        .clone()
        .filter(bookings::start_date.lt(now))
        .order(bookings::start_date.desc())
        .select(Booking::as_select())
        .first(conn)
        .optional()?;

    let next = approved
        .filter(bookings::start_date.gt(now))
        .order(bookings::start_date.asc())
        .select(Booking::as_select())
        .first(conn)
        .optional()?;

    debug!(has_last = last.is_some(), has_next = next.is_some(), "Resolved neighbouring bookings");

    Ok((last, next))
}

/// Checks whether a user has finished an approved booking of an item
#[instrument(skip(pool), fields(item_id = %item_id, booker_id = %booker_id))]
pub fn has_completed_booking(pool: &DbPool, item_id: i32, booker_id: i32, now: NaiveDateTime) -> Result<bool> {
    let conn = &mut pool.get()?;

    let found = bookings::table
        .filter(bookings::item_id.eq(item_id))
        .filter(bookings::booker_id.eq(booker_id))
        .filter(bookings::status.eq(BookingStatus::Approved))
        .filter(bookings::end_date.lt(now))
        .select(bookings::id)
        .first::<i32>(conn)
        .optional()?
        .is_some();

    debug!("Completed booking found: {}", found);

    Ok(found)
}
