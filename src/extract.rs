//! Request extractors shared by the handlers
//!
//! Every rejection is turned into an [`ApiError`] so clients always receive
//! the same `{"error": ...}` body, whichever part of the request was wrong.

use axum::extract::{FromRequest, FromRequestParts, Json, Request};
use axum::http::request::Parts;
use axum_extra::extract::Query;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::dto::SHARER_ID_HEADER;
use crate::errors::ApiError;

/// The acting user's ID, taken from the `X-Sharer-User-Id` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharerId(pub i32);

impl<S> FromRequestParts<S> for SharerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SHARER_ID_HEADER)
            .ok_or_else(|| ApiError::Validation(format!("Missing {} header", SHARER_ID_HEADER)))?;

        raw.to_str()
            .ok()
            .and_then(|value| value.trim().parse::<i32>().ok())
            .map(SharerId)
            .ok_or_else(|| ApiError::Validation(format!("{} header must be an integer", SHARER_ID_HEADER)))
    }
}

/// A JSON body that has been deserialized and validated
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| ApiError::Validation(format_validation_errors(&errors)))?;
        Ok(Self(value))
    }
}

/// Path parameters whose parse failures become [`ApiError::Validation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) = axum::extract::Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// A query string that has been deserialized and validated
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.to_string()))?;
        value
            .validate()
            .map_err(|errors| ApiError::Validation(format_validation_errors(&errors)))?;
        Ok(Self(value))
    }
}

/// Flattens validation errors into a single stable message
///
/// Fields are listed alphabetically. Struct-level errors appear without a
/// field prefix.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    let mut messages = Vec::new();
    for (field, field_errors) in fields {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            if field == "__all__" {
                messages.push(message);
            } else {
                messages.push(format!("{}: {}", field, message));
            }
        }
    }

    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use crate::dto::{CreateUserDto, PageQuery};

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = HttpRequest::builder().uri("/items");
        if let Some(value) = value {
            builder = builder.header(SHARER_ID_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_sharer_id_parsed() {
        let mut parts = parts_with_header(Some("42"));
        let id = SharerId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(id, SharerId(42));
    }

    #[tokio::test]
    async fn test_sharer_id_missing() {
        let mut parts = parts_with_header(None);
        let err = SharerId::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_sharer_id_not_numeric() {
        let mut parts = parts_with_header(Some("abc"));
        let err = SharerId::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/users")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_validated_json_accepts_valid_body() {
        let req = json_request(r#"{"name":"Ann","email":"ann@example.com"}"#);
        let ValidatedJson(dto) = ValidatedJson::<CreateUserDto>::from_request(req, &()).await.unwrap();
        assert_eq!(dto.name, "Ann");
    }

    #[tokio::test]
    async fn test_validated_json_reports_invalid_fields() {
        let req = json_request(r#"{"name":" ","email":"nope"}"#);
        let err = ValidatedJson::<CreateUserDto>::from_request(req, &()).await.unwrap_err();
        match err {
            ApiError::Validation(message) => {
                assert_eq!(message, "email: must be a well-formed email address, name: must not be blank");
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validated_json_rejects_malformed_body() {
        let req = json_request(r#"{"name":"Ann""#);
        let err = ValidatedJson::<CreateUserDto>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_path_rejects_non_numeric_id() {
        let app = axum::Router::new().route(
            "/users/{id}",
            axum::routing::get(|Path(id): Path<i32>| async move { id.to_string() }),
        );

        let response = tower::ServiceExt::oneshot(
            app.clone(),
            HttpRequest::builder().uri("/users/12").body(Body::empty()).unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let response = tower::ServiceExt::oneshot(
            app,
            HttpRequest::builder().uri("/users/abc").body(Body::empty()).unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("abc"));
    }

    #[tokio::test]
    async fn test_validated_query_defaults_and_bounds() {
        let mut parts = HttpRequest::builder().uri("/requests/all").body(()).unwrap().into_parts().0;
        let ValidatedQuery(page) = ValidatedQuery::<PageQuery>::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!((page.from, page.size), (0, 10));

        let mut parts = HttpRequest::builder().uri("/requests/all?from=0&size=0").body(()).unwrap().into_parts().0;
        let err = ValidatedQuery::<PageQuery>::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
