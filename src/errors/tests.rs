use super::*;
use axum::body::to_bytes;
use axum::response::IntoResponse;

/// Helper to extract status code and body JSON from an ApiError response
async fn error_response(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_database_error_response_hides_cause() {
    let error = ApiError::Database(anyhow::anyhow!("connection refused"));
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_not_found_response() {
    let error = ApiError::NotFound("User with id 4 not found".to_string());
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User with id 4 not found");
}

#[tokio::test]
async fn test_validation_response() {
    let msg = "name: must not be blank".to_string();
    let (status, body) = error_response(ApiError::Validation(msg.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], msg);
}

#[tokio::test]
async fn test_unknown_state_response() {
    let (status, body) = error_response(ApiError::UnknownState("UNSUPPORTED_STATUS".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown state: UNSUPPORTED_STATUS");
}

#[tokio::test]
async fn test_access_denied_response() {
    let (status, body) = error_response(ApiError::AccessDenied("User 2 does not own item 1".to_string())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "User 2 does not own item 1");
}

#[tokio::test]
async fn test_conflict_response() {
    let (status, body) = error_response(ApiError::Conflict("Email already in use".to_string())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already in use");
}
