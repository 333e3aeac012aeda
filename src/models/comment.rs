use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Review text left on an item by a user who has rented it
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Comment {
    id: i32,
    text: String,
    item_id: i32,
    author_id: i32,
    created: NaiveDateTime,
}

/// A comment that has not been stored yet
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub text: String,
    pub item_id: i32,
    pub author_id: i32,
    pub created: NaiveDateTime,
}

impl NewComment {
    /// Creates a comment stamped with the current time
    pub fn new(text: String, item_id: i32, author_id: i32) -> Self {
        Self {
            text,
            item_id,
            author_id,
            created: Utc::now().naive_utc(),
        }
    }
}

impl Comment {
    pub fn get_id(&self) -> i32 {
        self.id
    }

    pub fn get_text(&self) -> String {
        self.text.clone()
    }

    pub fn get_item_id(&self) -> i32 {
        self.item_id
    }

    pub fn get_author_id(&self) -> i32 {
        self.author_id
    }

    pub fn get_created(&self) -> NaiveDateTime {
        self.created
    }
}
