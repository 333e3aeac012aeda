/// Data models module
///
/// This module defines the database rows used throughout the application,
/// together with the insertable forms used when creating them.

mod booking_status;
pub use booking_status::BookingStatus;

mod user;
pub use user::{NewUser, User};

mod item_request;
pub use item_request::{ItemRequest, NewItemRequest};

mod item;
pub use item::{Item, NewItem};

mod booking;
pub use booking::{Booking, NewBooking};

mod comment;
pub use comment::{Comment, NewComment};
