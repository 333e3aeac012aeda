use crate::db::DbPool;
use crate::models::{NewUser, User};
use crate::schema::users;
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Creates a new user in the database
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `new_user` - The name and email of the user to create
///
/// ### Returns
///
/// A Result containing the stored User, with its assigned ID
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The insert fails, including when the email is already taken
#[instrument(skip(pool, new_user), fields(email = %new_user.email))]
pub fn create_user(pool: &DbPool, new_user: NewUser) -> Result<User> {
    debug!("Creating new user");

    let conn = &mut pool.get()?;

    let user = diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(conn)?;

    info!("Successfully created user with id: {}", user.get_id());

    Ok(user)
}

/// Retrieves a user by ID
///
/// ### Returns
///
/// A Result containing Some(User) if found, or None if not found
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn get_user(pool: &DbPool, user_id: i32) -> Result<Option<User>> {
    debug!("Retrieving user by id");

    let conn = &mut pool.get()?;

    let result = users::table
        .find(user_id)
        .select(User::as_select())
        .first(conn)
        .optional()?;

    if result.is_none() {
        debug!("User not found");
    }

    Ok(result)
}

/// Retrieves several users at once, in no particular order
#[instrument(skip(pool, user_ids), fields(count = user_ids.len()))]
pub fn get_users(pool: &DbPool, user_ids: &[i32]) -> Result<Vec<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .filter(users::id.eq_any(user_ids))
        .select(User::as_select())
        .load(conn)?;

    Ok(result)
}

/// Lists every user in ID order
#[instrument(skip(pool))]
pub fn list_users(pool: &DbPool) -> Result<Vec<User>> {
    debug!("Listing all users");

    let conn = &mut pool.get()?;

    let result = users::table
        .order(users::id.asc())
        .select(User::as_select())
        .load(conn)?;

    info!("Retrieved {} users", result.len());

    Ok(result)
}

/// Updates the given fields of a user, leaving absent ones unchanged
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The ID of the user to update
/// * `name` - The new name, if it should change
/// * `email` - The new email, if it should change
///
/// ### Errors
///
/// Returns an error if the user does not exist or the update fails.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn update_user(pool: &DbPool, user_id: i32, name: Option<String>, email: Option<String>) -> Result<User> {
    debug!("Updating user");

    #[derive(AsChangeset)]
    #[diesel(table_name = users)]
    struct UserChangeset {
        name: Option<String>,
        email: Option<String>,
    }

    let conn = &mut pool.get()?;

    let user = if name.is_none() && email.is_none() {
        // An empty changeset is an error in diesel
        users::table.find(user_id).select(User::as_select()).first(conn)?
    } else {
        diesel::update(users::table.find(user_id))
            .set(UserChangeset { name, email })
            .returning(User::as_returning())
            .get_result(conn)?
    };

    info!("Successfully updated user");

    Ok(user)
}

/// Deletes a user by ID
///
/// Items, bookings, requests and comments belonging to the user are removed
/// by the database's cascading foreign keys.
///
/// ### Returns
///
/// The number of deleted rows (0 or 1)
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn delete_user(pool: &DbPool, user_id: i32) -> Result<usize> {
    debug!("Deleting user");

    let conn = &mut pool.get()?;

    let deleted = diesel::delete(users::table.find(user_id)).execute(conn)?;

    info!("Deleted {} user rows", deleted);

    Ok(deleted)
}

/// Checks whether an email belongs to some user other than `exclude_id`
#[instrument(skip(pool))]
pub fn email_taken(pool: &DbPool, email: &str, exclude_id: Option<i32>) -> Result<bool> {
    let conn = &mut pool.get()?;

    let mut query = users::table
        .filter(users::email.eq(email))
        .select(users::id)
        .into_boxed();
    if let Some(id) = exclude_id {
        query = query.filter(users::id.ne(id));
    }

    let taken = query.first::<i32>(conn).optional()?.is_some();
    debug!("Email taken: {}", taken);

    Ok(taken)
}
