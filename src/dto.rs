use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{Booking, BookingStatus, Comment, Item, ItemRequest, User};

/// Header carrying the ID of the user performing a request
pub const SHARER_ID_HEADER: &str = "X-Sharer-User-Id";

/// Rejects strings that are empty or only whitespace
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

// ── Request bodies ───────────────────────────────────────────────────

/// Data transfer object for registering a user
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateUserDto {
    #[validate(custom = "not_blank")]
    pub name: String,

    #[validate(email(message = "must be a well-formed email address"))]
    pub email: String,
}

/// Data transfer object for partially updating a user
///
/// Absent fields are left unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateUserDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "not_blank")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "must be a well-formed email address"))]
    pub email: Option<String>,
}

/// Data transfer object for listing a new item
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemDto {
    #[validate(custom = "not_blank")]
    pub name: String,

    #[validate(custom = "not_blank")]
    pub description: String,

    /// Whether the item can be booked right away
    pub available: bool,

    /// The item request this item answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "must be positive"))]
    pub request_id: Option<i32>,
}

/// Data transfer object for partially updating an item
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateItemDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "not_blank")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "not_blank")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

/// Data transfer object for commenting on an item
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateCommentDto {
    #[validate(custom = "not_blank")]
    pub text: String,
}

/// Data transfer object for booking an item
///
/// Dates are interpreted as UTC.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_booking_dates"))]
pub struct CreateBookingDto {
    #[validate(range(min = 1, message = "must be positive"))]
    pub item_id: i32,

    pub start: NaiveDateTime,

    pub end: NaiveDateTime,
}

fn validate_booking_dates(dto: &CreateBookingDto) -> Result<(), ValidationError> {
    // The wire format has whole-second precision, so "now" does too
    let now = Utc::now().naive_utc().with_nanosecond(0).unwrap_or_else(|| Utc::now().naive_utc());
    check_booking_dates(dto.start, dto.end, now)
}

/// Checks a booking range against the current time
///
/// Both ends must be at or after `now`, and the start must be strictly
/// before the end.
pub fn check_booking_dates(start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> Result<(), ValidationError> {
    let reject = |code: &'static str, message: &'static str| {
        let mut error = ValidationError::new(code);
        error.message = Some(message.into());
        Err(error)
    };

    if start < now {
        return reject("start_in_past", "start must not be in the past");
    }
    if end < now {
        return reject("end_in_past", "end must not be in the past");
    }
    if start >= end {
        return reject("start_not_before_end", "start must be before end");
    }
    Ok(())
}

/// Data transfer object for posting an item request
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateItemRequestDto {
    #[validate(custom = "not_blank")]
    pub description: String,
}

// ── Query strings ────────────────────────────────────────────────────

/// Query for `PATCH /bookings/{id}`
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct ApprovalQuery {
    pub approved: bool,
}

/// Query for the booking listings
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
#[serde(default)]
pub struct BookingStateQuery {
    pub state: Option<String>,
}

impl BookingStateQuery {
    /// Parses the requested state, defaulting to `ALL`
    ///
    /// ### Errors
    ///
    /// Returns the raw value if it names no known state.
    pub fn parse(&self) -> Result<BookingState, String> {
        match &self.state {
            Some(raw) => raw.parse(),
            None => Ok(BookingState::All),
        }
    }
}

/// Query for `GET /items/search`
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SearchQuery {
    pub text: String,
}

/// Offset pagination for `GET /requests/all`
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(default)]
pub struct PageQuery {
    #[validate(range(min = 0, message = "must not be negative"))]
    pub from: i64,

    #[validate(range(min = 1, message = "must be positive"))]
    pub size: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { from: 0, size: 10 }
    }
}

/// Which bookings a listing should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingState {
    All,
    /// Started and not yet ended
    Current,
    /// Already ended
    Past,
    /// Not yet started
    Future,
    Waiting,
    Rejected,
}

impl BookingState {
    pub const VALUES: [BookingState; 6] = [
        BookingState::All,
        BookingState::Current,
        BookingState::Past,
        BookingState::Future,
        BookingState::Waiting,
        BookingState::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::All => "ALL",
            BookingState::Current => "CURRENT",
            BookingState::Past => "PAST",
            BookingState::Future => "FUTURE",
            BookingState::Waiting => "WAITING",
            BookingState::Rejected => "REJECTED",
        }
    }

    /// Whether a booking belongs in this listing at time `now`
    pub fn matches(&self, booking: &Booking, now: NaiveDateTime) -> bool {
        match self {
            BookingState::All => true,
            BookingState::Current => booking.get_start() < now && booking.get_end() > now,
            BookingState::Past => booking.get_end() < now,
            BookingState::Future => booking.get_start() > now,
            BookingState::Waiting => booking.get_status() == BookingStatus::Waiting,
            BookingState::Rejected => booking.get_status() == BookingStatus::Rejected,
        }
    }
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingState {
    type Err = String;

    /// Parses a state name case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::VALUES
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| s.to_string())
    }
}

// ── Responses ────────────────────────────────────────────────────────

/// Compact booking reference shown on an item to its owner
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingShortDto {
    pub id: i32,
    pub booker_id: i32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl From<&Booking> for BookingShortDto {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.get_id(),
            booker_id: booking.get_booker_id(),
            start: booking.get_start(),
            end: booking.get_end(),
        }
    }
}

/// A comment together with its author's name
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i32,
    pub text: String,
    pub author_name: String,
    pub created: NaiveDateTime,
}

impl CommentDto {
    pub fn new(comment: &Comment, author: &User) -> Self {
        Self {
            id: comment.get_id(),
            text: comment.get_text(),
            author_name: author.get_name(),
            created: comment.get_created(),
        }
    }
}

/// An item with its comments and, for the owner, its neighbouring bookings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailsDto {
    #[serde(flatten)]
    pub item: Item,
    pub last_booking: Option<BookingShortDto>,
    pub next_booking: Option<BookingShortDto>,
    pub comments: Vec<CommentDto>,
}

/// A booking with the booker and item expanded
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BookingDto {
    pub id: i32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub booker: User,
    pub item: Item,
}

impl BookingDto {
    pub fn new(booking: &Booking, booker: User, item: Item) -> Self {
        Self {
            id: booking.get_id(),
            start: booking.get_start(),
            end: booking.get_end(),
            status: booking.get_status(),
            booker,
            item,
        }
    }
}

/// An item request with the items listed in answer to it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestDto {
    pub id: i32,
    pub description: String,
    pub requester_id: i32,
    pub created: NaiveDateTime,
    pub items: Vec<Item>,
}

impl ItemRequestDto {
    pub fn new(request: &ItemRequest, items: Vec<Item>) -> Self {
        Self {
            id: request.get_id(),
            description: request.get_description(),
            requester_id: request.get_requester_id(),
            created: request.get_created(),
            items,
        }
    }
}
