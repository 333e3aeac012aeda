/// Integration tests for user management
///
/// This file covers registering, reading, updating and deleting users,
/// including email uniqueness and what a deletion takes with it.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

/// Tests the full lifecycle of a user through the API
#[tokio::test]
async fn test_user_lifecycle() {
    let app = create_test_app();

    let (status, user) = send(&app, "POST", "/users", None, Some(json!({
        "name": "Alice",
        "email": "alice@example.com",
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["name"], "Alice");
    assert_eq!(user["email"], "alice@example.com");
    let id = user["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, "GET", &format!("/users/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, user);

    let (status, updated) = send(&app, "PATCH", &format!("/users/{}", id), None, Some(json!({
        "name": "Alice Smith",
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Alice Smith");
    assert_eq!(updated["email"], "alice@example.com");

    let (status, deleted) = send(&app, "DELETE", &format!("/users/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"].as_i64(), Some(id));

    let (status, body) = send(&app, "GET", &format!("/users/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

/// Tests that users are listed in creation order
#[tokio::test]
async fn test_list_users() {
    let app = create_test_app();

    let (status, users) = send(&app, "GET", "/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users, json!([]));

    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;

    let (_, users) = send(&app, "GET", "/users", None, None).await;
    assert_eq!(ids(&users), vec![alice as i64, bob as i64]);
}

/// Tests that a taken email is refused on create and on update
#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = create_test_app();
    create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;

    let (status, body) = send(&app, "POST", "/users", None, Some(json!({
        "name": "Impostor",
        "email": "alice@example.com",
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("alice@example.com"));

    let (status, _) = send(&app, "PATCH", &format!("/users/{}", bob), None, Some(json!({
        "email": "alice@example.com",
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Keeping one's own email is not a conflict
    let (status, _) = send(&app, "PATCH", &format!("/users/{}", bob), None, Some(json!({
        "email": "bob@example.com",
    }))).await;
    assert_eq!(status, StatusCode::OK);
}

/// Tests that malformed user bodies are rejected with 400
#[tokio::test]
async fn test_invalid_user_bodies() {
    let app = create_test_app();

    let cases = [
        json!({"name": "Alice", "email": "not-an-email"}),
        json!({"name": "   ", "email": "alice@example.com"}),
        json!({"email": "alice@example.com"}),
        json!({"name": "Alice"}),
    ];
    for body in cases {
        let (status, response) = send(&app, "POST", "/users", None, Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {}", body);
        assert!(response["error"].is_string());
    }

    let (_, users) = send(&app, "GET", "/users", None, None).await;
    assert_eq!(users, json!([]));
}

/// Tests updating and deleting users that do not exist
#[tokio::test]
async fn test_missing_user() {
    let app = create_test_app();

    let (status, _) = send(&app, "PATCH", "/users/42", None, Some(json!({"name": "Ghost"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/users/42", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Tests that deleting a user removes their items and bookings
#[tokio::test]
async fn test_delete_user_cascades() {
    let app = create_test_app();
    let owner = create_user(&app, "Owner").await;
    let booker = create_user(&app, "Booker").await;
    let item = create_item(&app, owner, "Drill", "Cordless drill").await;

    let (status, booking) = create_booking(&app, booker, item, 1, 2).await;
    assert_eq!(status, StatusCode::OK);
    let booking_id = booking["id"].as_i64().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/users/{}", owner), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/items/{}", item), Some(booker), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &format!("/bookings/{}", booking_id), Some(booker), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Tests that a non-numeric ID in the path gets a JSON error
#[tokio::test]
async fn test_non_numeric_path_id() {
    let app = create_test_app();
    let user = create_user(&app, "User").await;

    for (method, uri) in [
        ("GET", "/users/abc"),
        ("DELETE", "/users/abc"),
        ("GET", "/items/abc"),
        ("POST", "/items/abc/comment"),
        ("GET", "/bookings/abc"),
        ("PATCH", "/bookings/abc?approved=true"),
        ("GET", "/requests/abc"),
    ] {
        let (status, body) = send(&app, method, uri, Some(user), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert!(body["error"].is_string(), "{} {} gave {}", method, uri, body);
    }
}
