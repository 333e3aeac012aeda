/// Integration tests for item requests
///
/// This file covers posting requests, answering them with items, and the
/// two listings: one's own requests and everybody else's, paged.

use axum::http::StatusCode;
use serde_json::{json, Value};
use shareit::dto::PageQuery;

mod common;
use common::*;

async fn create_request(app: &TestApp, user: i32, description: &str) -> i64 {
    let (status, request) = send(app, "POST", "/requests", Some(user), Some(json!({
        "description": description,
    }))).await;
    assert_eq!(status, StatusCode::OK, "creating request failed: {}", request);
    request["id"].as_i64().unwrap()
}

/// Tests posting a request and answering it with an item
#[tokio::test]
async fn test_request_answered_by_item() {
    let app = create_test_app();
    let requester = create_user(&app, "Requester").await;
    let owner = create_user(&app, "Owner").await;

    let (status, request) = send(&app, "POST", "/requests", Some(requester), Some(json!({
        "description": "Need a pressure washer for the weekend",
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(request["requesterId"].as_i64(), Some(requester as i64));
    assert_eq!(request["items"], json!([]));
    assert!(request["created"].is_string());
    let request_id = request["id"].as_i64().unwrap();

    let (status, item) = send(&app, "POST", "/items", Some(owner), Some(json!({
        "name": "Pressure washer",
        "description": "2000 W",
        "available": true,
        "requestId": request_id,
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["requestId"].as_i64(), Some(request_id));

    let (status, fetched) = send(&app, "GET", &format!("/requests/{}", request_id), Some(owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["description"], "Need a pressure washer for the weekend");
    let items = fetched["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Pressure washer");

    let (_, own) = send(&app, "GET", "/requests", Some(requester), None).await;
    assert_eq!(own[0]["items"][0]["id"], item["id"]);
}

/// Tests the errors when posting or reading requests
#[tokio::test]
async fn test_request_errors() {
    let app = create_test_app();
    let user = create_user(&app, "User").await;

    let (status, _) = send(&app, "POST", "/requests", Some(user), Some(json!({"description": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/requests", Some(user + 100), Some(json!({"description": "Tent"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/requests", None, Some(json!({"description": "Tent"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/requests/999", Some(user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = create_request(&app, user, "Tent").await;
    let (status, _) = send(&app, "GET", &format!("/requests/{}", request), Some(user + 100), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Tests that the own listing holds only the user's requests, oldest first
#[tokio::test]
async fn test_list_own_requests() {
    let app = create_test_app();
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;

    let first = create_request(&app, alice, "Tent").await;
    create_request(&app, bob, "Kayak").await;
    let second = create_request(&app, alice, "Sleeping bag").await;

    let (status, requests) = send(&app, "GET", "/requests", Some(alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&requests), vec![first, second]);
}

/// Tests paging through other users' requests
#[tokio::test]
async fn test_list_other_requests_paged() {
    let app = create_test_app();
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;

    create_request(&app, alice, "Alice's own").await;
    let mut bobs = Vec::new();
    for n in 0..5 {
        bobs.push(create_request(&app, bob, &format!("Request {}", n)).await);
    }

    let (status, all) = send(&app, "GET", "/requests/all", Some(alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&all), bobs);

    let query = serde_html_form::to_string(PageQuery { from: 1, size: 2 }).unwrap();
    let (status, page) = send(&app, "GET", &format!("/requests/all?{}", query), Some(alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&page), bobs[1..3].to_vec());

    let query = serde_html_form::to_string(PageQuery { from: 10, size: 2 }).unwrap();
    let (status, page) = send(&app, "GET", &format!("/requests/all?{}", query), Some(alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page, json!([]));

    // Bob only sees Alice's
    let (_, page) = send(&app, "GET", "/requests/all", Some(bob), None).await;
    assert_eq!(page.as_array().map(Vec::len), Some(1));
    assert_eq!(page[0]["description"], Value::from("Alice's own"));
}

/// Tests that invalid paging parameters are rejected
#[tokio::test]
async fn test_invalid_paging() {
    let app = create_test_app();
    let user = create_user(&app, "User").await;

    for query in ["from=-1&size=10", "from=0&size=0", "from=0&size=-5", "size=abc"] {
        let (status, body) = send(&app, "GET", &format!("/requests/all?{}", query), Some(user), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {}", query);
        assert!(body["error"].is_string());
    }
}
