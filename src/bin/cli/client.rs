use chrono::NaiveDateTime;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shareit::dto::{
    BookingDto, BookingState, CommentDto, CreateBookingDto, CreateCommentDto, CreateItemDto,
    CreateItemRequestDto, CreateUserDto, ItemDetailsDto, ItemRequestDto, UpdateItemDto,
    UpdateUserDto, SHARER_ID_HEADER,
};
use shareit::models::{Item, User};

/// Error type for CLI client operations
#[derive(Debug)]
pub enum ClientError {
    /// Server returned an error status with a message body
    Server { status: reqwest::StatusCode, message: String },
    /// Network/connection/request error
    Request(reqwest::Error),
    /// The command needs an acting user but none was given
    MissingUser,
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status.as_u16(), message)
            }
            ClientError::Request(err) => write!(f, "{}", err),
            ClientError::MissingUser => {
                write!(f, "This command acts as a user; pass --user or set SHAREIT_USER_ID")
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Request(err) => Some(err),
            ClientError::Server { .. } | ClientError::MissingUser => None,
        }
    }
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => body.get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// HTTP client wrapper for communicating with the ShareIt server
pub struct ShareItClient {
    /// The base URL of the server (e.g. "http://localhost:8080")
    base_url: String,
    /// Sent as the `X-Sharer-User-Id` header when set
    user_id: Option<i32>,
    /// The underlying HTTP client
    client: Client,
}

impl ShareItClient {
    /// Creates a new ShareItClient
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the ShareIt server
    /// * `user_id` - The user the CLI acts as, if any
    pub fn new(base_url: String, user_id: Option<i32>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id,
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Adds the acting-user header, failing if no user was configured
    fn as_user(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let user_id = self.user_id.ok_or(ClientError::MissingUser)?;
        Ok(request.header(SHARER_ID_HEADER, user_id))
    }

    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    // ── User endpoints ───────────────────────────────────────────────

    /// Registers a new user
    pub async fn create_user(&self, name: String, email: String) -> Result<User, ClientError> {
        let dto = CreateUserDto { name, email };
        Self::fetch(self.client.post(self.url("/users")).json(&dto)).await
    }

    /// Lists every user
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        Self::fetch(self.client.get(self.url("/users"))).await
    }

    /// Gets a user by ID
    pub async fn get_user(&self, id: i32) -> Result<User, ClientError> {
        Self::fetch(self.client.get(self.url(&format!("/users/{}", id)))).await
    }

    /// Changes a user's name and/or email
    pub async fn update_user(
        &self,
        id: i32,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, ClientError> {
        let dto = UpdateUserDto { name, email };
        Self::fetch(self.client.patch(self.url(&format!("/users/{}", id))).json(&dto)).await
    }

    /// Deletes a user, returning the removed record
    pub async fn delete_user(&self, id: i32) -> Result<User, ClientError> {
        Self::fetch(self.client.delete(self.url(&format!("/users/{}", id)))).await
    }

    // ── Item endpoints ───────────────────────────────────────────────

    /// Lists an item owned by the acting user
    pub async fn create_item(
        &self,
        name: String,
        description: String,
        available: bool,
        request_id: Option<i32>,
    ) -> Result<Item, ClientError> {
        let dto = CreateItemDto { name, description, available, request_id };
        Self::fetch(self.as_user(self.client.post(self.url("/items")))?.json(&dto)).await
    }

    /// Lists the acting user's items with their bookings and comments
    pub async fn list_items(&self) -> Result<Vec<ItemDetailsDto>, ClientError> {
        Self::fetch(self.as_user(self.client.get(self.url("/items")))?).await
    }

    /// Gets an item with its comments
    pub async fn get_item(&self, id: i32) -> Result<ItemDetailsDto, ClientError> {
        Self::fetch(self.as_user(self.client.get(self.url(&format!("/items/{}", id))))?).await
    }

    /// Searches available items by name or description
    pub async fn search_items(&self, text: &str) -> Result<Vec<Item>, ClientError> {
        let request = self.client.get(self.url("/items/search")).query(&[("text", text)]);
        Self::fetch(request).await
    }

    /// Changes fields of an item owned by the acting user
    pub async fn update_item(&self, id: i32, update: UpdateItemDto) -> Result<Item, ClientError> {
        let request = self.as_user(self.client.patch(self.url(&format!("/items/{}", id))))?;
        Self::fetch(request.json(&update)).await
    }

    /// Deletes an item owned by the acting user
    pub async fn delete_item(&self, id: i32) -> Result<(), ClientError> {
        let request = self.as_user(self.client.delete(self.url(&format!("/items/{}", id))))?;
        request.send().await.map_err(ClientError::Request)?.check().await?;
        Ok(())
    }

    /// Comments on an item the acting user has rented
    pub async fn add_comment(&self, item_id: i32, text: String) -> Result<CommentDto, ClientError> {
        let dto = CreateCommentDto { text };
        let request = self.as_user(self.client.post(self.url(&format!("/items/{}/comment", item_id))))?;
        Self::fetch(request.json(&dto)).await
    }

    // ── Booking endpoints ────────────────────────────────────────────

    /// Books an item for the acting user
    pub async fn create_booking(
        &self,
        item_id: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<BookingDto, ClientError> {
        let dto = CreateBookingDto { item_id, start, end };
        Self::fetch(self.as_user(self.client.post(self.url("/bookings")))?.json(&dto)).await
    }

    /// Approves or rejects a booking of one of the acting user's items
    pub async fn approve_booking(&self, id: i32, approved: bool) -> Result<BookingDto, ClientError> {
        let request = self
            .as_user(self.client.patch(self.url(&format!("/bookings/{}", id))))?
            .query(&[("approved", approved)]);
        Self::fetch(request).await
    }

    /// Gets a booking visible to the acting user
    pub async fn get_booking(&self, id: i32) -> Result<BookingDto, ClientError> {
        Self::fetch(self.as_user(self.client.get(self.url(&format!("/bookings/{}", id))))?).await
    }

    /// Lists bookings made by the acting user
    pub async fn list_bookings(&self, state: BookingState) -> Result<Vec<BookingDto>, ClientError> {
        let request = self
            .as_user(self.client.get(self.url("/bookings")))?
            .query(&[("state", state.as_str())]);
        Self::fetch(request).await
    }

    /// Lists bookings of items owned by the acting user
    pub async fn list_owner_bookings(&self, state: BookingState) -> Result<Vec<BookingDto>, ClientError> {
        let request = self
            .as_user(self.client.get(self.url("/bookings/owner")))?
            .query(&[("state", state.as_str())]);
        Self::fetch(request).await
    }

    // ── Item request endpoints ───────────────────────────────────────

    /// Posts a request for an item nobody offers yet
    pub async fn create_request(&self, description: String) -> Result<ItemRequestDto, ClientError> {
        let dto = CreateItemRequestDto { description };
        Self::fetch(self.as_user(self.client.post(self.url("/requests")))?.json(&dto)).await
    }

    /// Lists the acting user's own requests
    pub async fn list_own_requests(&self) -> Result<Vec<ItemRequestDto>, ClientError> {
        Self::fetch(self.as_user(self.client.get(self.url("/requests")))?).await
    }

    /// Pages through everybody else's requests
    pub async fn list_other_requests(&self, from: i64, size: i64) -> Result<Vec<ItemRequestDto>, ClientError> {
        let request = self
            .as_user(self.client.get(self.url("/requests/all")))?
            .query(&[("from", from), ("size", size)]);
        Self::fetch(request).await
    }

    /// Gets a single request with its answering items
    pub async fn get_request(&self, id: i32) -> Result<ItemRequestDto, ClientError> {
        Self::fetch(self.as_user(self.client.get(self.url(&format!("/requests/{}", id))))?).await
    }
}
