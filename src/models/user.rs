use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Represents a registered user
///
/// Users own items, book other users' items, leave comments and post item
/// requests. The email address is unique across all users.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    /// Database-assigned identifier
    id: i32,

    /// Display name
    name: String,

    /// Unique email address
    email: String,
}

/// A user that has not been stored yet
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: String, email: String) -> Self {
        Self { name, email }
    }
}

impl User {
    /// Creates a user with all fields specified
    ///
    /// Mostly useful for tests and for clients rebuilding a user from JSON.
    pub fn new_with_fields(id: i32, name: String, email: String) -> Self {
        Self { id, name, email }
    }

    /// Gets the user's ID
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the user's name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Gets the user's email address
    pub fn get_email(&self) -> String {
        self.email.clone()
    }
}
