use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::BookingStatus;

/// Represents a reservation of an item by a user for a date range
///
/// Dates are naive UTC timestamps. The database rejects rows whose start is
/// not strictly before their end.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Booking {
    /// Database-assigned identifier
    id: i32,

    /// When the booking begins
    start_date: NaiveDateTime,

    /// When the booking ends
    end_date: NaiveDateTime,

    /// The booked item
    item_id: i32,

    /// The user who made the booking
    booker_id: i32,

    /// Where the booking is in its lifecycle
    status: BookingStatus,
}

/// A booking that has not been stored yet
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::bookings)]
pub struct NewBooking {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub item_id: i32,
    pub booker_id: i32,
    pub status: BookingStatus,
}

impl NewBooking {
    /// Creates a booking request waiting for the owner's decision
    pub fn waiting(item_id: i32, booker_id: i32, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            start_date,
            end_date,
            item_id,
            booker_id,
            status: BookingStatus::Waiting,
        }
    }
}

impl Booking {
    /// Creates a booking with all fields specified
    pub fn new_with_fields(
        id: i32,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
        item_id: i32,
        booker_id: i32,
        status: BookingStatus,
    ) -> Self {
        Self {
            id,
            start_date,
            end_date,
            item_id,
            booker_id,
            status,
        }
    }

    /// Gets the booking's ID
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the start of the booked range
    pub fn get_start(&self) -> NaiveDateTime {
        self.start_date
    }

    /// Gets the end of the booked range
    pub fn get_end(&self) -> NaiveDateTime {
        self.end_date
    }

    /// Gets the ID of the booked item
    pub fn get_item_id(&self) -> i32 {
        self.item_id
    }

    /// Gets the ID of the booker
    pub fn get_booker_id(&self) -> i32 {
        self.booker_id
    }

    /// Gets the booking's status
    pub fn get_status(&self) -> BookingStatus {
        self.status
    }

    /// Whether the given user made this booking
    pub fn is_booked_by(&self, user_id: i32) -> bool {
        self.booker_id == user_id
    }
}
