use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Represents a rentable item
///
/// This struct maps directly to the `items` table. Only available items can
/// be booked, and an item may have been created in answer to an item request.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Database-assigned identifier
    id: i32,

    /// Short name shown in listings
    name: String,

    /// Free-form description
    description: String,

    /// Whether the item can currently be booked
    available: bool,

    /// The user who lists the item
    owner_id: i32,

    /// The item request this item answers, if any
    request_id: Option<i32>,
}

/// An item that has not been stored yet
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::items)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i32,
    pub request_id: Option<i32>,
}

impl Item {
    /// Creates an item with all fields specified
    ///
    /// ### Arguments
    ///
    /// * `id` - The identifier of the item
    /// * `name` - The item name
    /// * `description` - The item description
    /// * `available` - Whether the item can be booked
    /// * `owner_id` - The owning user
    /// * `request_id` - The item request this item answers
    pub fn new_with_fields(
        id: i32,
        name: String,
        description: String,
        available: bool,
        owner_id: i32,
        request_id: Option<i32>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            available,
            owner_id,
            request_id,
        }
    }

    /// Gets the item's ID
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the item's name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Gets the item's description
    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    /// Whether the item can currently be booked
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Gets the ID of the owning user
    pub fn get_owner_id(&self) -> i32 {
        self.owner_id
    }

    /// Gets the ID of the item request this item answers
    pub fn get_request_id(&self) -> Option<i32> {
        self.request_id
    }

    /// Whether the given user owns this item
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.owner_id == user_id
    }
}
