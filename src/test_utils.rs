use crate::*;
use crate::models::{Booking, BookingStatus, Item, NewBooking, NewItem, NewUser, User};
use proptest::prelude::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use diesel::RunQueryDsl;
use std::sync::Arc;
use tower::ServiceExt;

/// Sets up a test database with migrations applied
///
/// Each call gets its own named in-memory database. Plain ":memory:" would
/// give every pooled connection a separate database, so the URI uses
/// `cache=shared` to let the whole pool see the migrated schema.
pub fn setup_test_db() -> Arc<db::DbPool> {
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url).expect("Failed to create pool");

    let mut conn = pool.get().expect("Failed to get connection");
    run_migrations(&mut conn).expect("Failed to run migrations");

    Arc::new(pool)
}

/// The current time truncated to whole seconds
pub fn now() -> NaiveDateTime {
    let now = Utc::now().timestamp();
    DateTime::from_timestamp(now, 0).unwrap().naive_utc()
}

/// Creates a user with a unique email derived from `name`
pub fn insert_user(pool: &db::DbPool, name: &str) -> User {
    let email = format!("{}-{}@example.com", name.to_lowercase(), uuid::Uuid::new_v4());
    repo::create_user(pool, NewUser::new(name.to_string(), email)).unwrap()
}

/// Creates an available item owned by `owner_id`
pub fn insert_item(pool: &db::DbPool, owner_id: i32, name: &str) -> Item {
    let new_item = NewItem {
        name: name.to_string(),
        description: format!("A {} in good condition", name),
        available: true,
        owner_id,
        request_id: None,
    };
    repo::create_item(pool, new_item).unwrap()
}

/// Creates a booking with the given status, bypassing request validation
///
/// Offsets are in hours relative to now, so past bookings can be seeded.
pub fn insert_booking(
    pool: &db::DbPool,
    item_id: i32,
    booker_id: i32,
    start_offset_hours: i64,
    end_offset_hours: i64,
    status: BookingStatus,
) -> Booking {
    let now = now();
    let mut new_booking = NewBooking::waiting(
        item_id,
        booker_id,
        now + Duration::hours(start_offset_hours),
        now + Duration::hours(end_offset_hours),
    );
    new_booking.status = status;
    repo::create_booking(pool, new_booking).unwrap()
}

use diesel::sql_types::Text;
use diesel::QueryableByName;

#[derive(QueryableByName, Debug)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

#[tokio::test]
async fn test_setup_test_db() {
    let pool = setup_test_db();
    let mut conn = pool.get().unwrap();

    let table_names: Vec<TableName> = diesel::sql_query("SELECT name FROM sqlite_master WHERE type='table'")
        .load(&mut conn)
        .expect("Failed to load table names");

    let expected_tables = vec![
        "users", "item_requests", "items", "bookings", "comments",
        "__diesel_schema_migrations",
    ];

    for table in expected_tables {
        let exists = table_names.iter().any(|t| t.name == table);
        assert!(exists, "Table '{}' not found in database", table);

        let query = format!("SELECT COUNT(*) FROM {}", table);
        let result = diesel::sql_query(&query).execute(&mut conn);
        assert!(result.is_ok(), "Failed to query table '{}': {:?}", table, result.err());
    }

    drop(conn);

    let app = create_app(pool.clone());
    let request = Request::builder()
        .uri("/users")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_foreign_keys_are_enforced() {
    let pool = setup_test_db();
    let orphan = NewItem {
        name: "Drill".to_string(),
        description: "Cordless".to_string(),
        available: true,
        owner_id: 999,
        request_id: None,
    };
    assert!(repo::create_item(&pool, orphan).is_err());
}

/// Generates an arbitrary NaiveDateTime within 2020-01-01 to 2030-01-01
pub fn arb_naive_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (1_577_836_800i64..1_893_456_000i64)
        .prop_map(|ts| DateTime::from_timestamp(ts, 0).unwrap().naive_utc())
}

/// Generates an arbitrary BookingStatus variant
pub fn arb_booking_status() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        Just(BookingStatus::Waiting),
        Just(BookingStatus::Approved),
        Just(BookingStatus::Rejected),
        Just(BookingStatus::Canceled),
    ]
}

/// Generates a known state name with arbitrary letter case
pub fn arb_state_name_any_case() -> impl Strategy<Value = (dto::BookingState, String)> {
    (
        prop::sample::select(dto::BookingState::VALUES.to_vec()),
        prop::collection::vec(any::<bool>(), 8),
    )
        .prop_map(|(state, upper)| {
            let name = state
                .as_str()
                .chars()
                .zip(upper.iter().cycle())
                .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
                .collect();
            (state, name)
        })
}

/// Generates a string made only of whitespace, possibly empty
pub fn arb_blank_string() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,10}"
}

/// Generates a string with at least one visible character, surrounded by noise
pub fn arb_messy_string() -> impl Strategy<Value = String> {
    "[ \t]{0,3}[a-zA-Z0-9!?._-][a-zA-Z0-9 !?._-]{0,30}"
}
