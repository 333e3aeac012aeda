use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's public ask for an item nobody has listed yet
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::item_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ItemRequest {
    /// Database-assigned identifier
    id: i32,

    /// What the requester is looking for
    description: String,

    /// The user who posted the request
    requester_id: i32,

    /// When the request was posted
    created: NaiveDateTime,
}

/// An item request that has not been stored yet
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::item_requests)]
pub struct NewItemRequest {
    pub description: String,
    pub requester_id: i32,
    pub created: NaiveDateTime,
}

impl NewItemRequest {
    /// Creates a request stamped with the current time
    pub fn new(description: String, requester_id: i32) -> Self {
        Self {
            description,
            requester_id,
            created: Utc::now().naive_utc(),
        }
    }
}

impl ItemRequest {
    /// Gets the request's ID
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the request's description
    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    /// Gets the ID of the requesting user
    pub fn get_requester_id(&self) -> i32 {
        self.requester_id
    }

    /// Gets the creation timestamp
    pub fn get_created(&self) -> NaiveDateTime {
        self.created
    }
}
