use crate::db::{unicode_lower, DbPool};
use crate::models::{Item, NewItem};
use crate::schema::items;
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Creates a new item in the database
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `new_item` - The item to insert, including its owner
///
/// ### Returns
///
/// A Result containing the stored Item, with its assigned ID
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The owner or the referenced item request does not exist
#[instrument(skip(pool, new_item), fields(owner_id = %new_item.owner_id, name = %new_item.name))]
pub fn create_item(pool: &DbPool, new_item: NewItem) -> Result<Item> {
    debug!("Creating new item");

    let conn = &mut pool.get()?;

    let item = diesel::insert_into(items::table)
        .values(&new_item)
        .returning(Item::as_returning())
        .get_result(conn)?;

    info!("Successfully created item with id: {}", item.get_id());

    Ok(item)
}

/// Retrieves an item from the database by its ID
///
/// ### Returns
///
/// A Result containing an Option with the Item if found, or None if not found
#[instrument(skip(pool), fields(item_id = %item_id))]
pub fn get_item(pool: &DbPool, item_id: i32) -> Result<Option<Item>> {
    debug!("Retrieving item by id");

    let conn = &mut pool.get()?;

    let result = items::table
        .find(item_id)
        .select(Item::as_select())
        .first(conn)
        .optional()?;

    if result.is_none() {
        debug!("Item not found");
    }

    Ok(result)
}

/// Retrieves several items at once, in no particular order
#[instrument(skip(pool, item_ids), fields(count = item_ids.len()))]
pub fn get_items(pool: &DbPool, item_ids: &[i32]) -> Result<Vec<Item>> {
    let conn = &mut pool.get()?;

    let result = items::table
        .filter(items::id.eq_any(item_ids))
        .select(Item::as_select())
        .load(conn)?;

    Ok(result)
}

/// Lists the items owned by a user, in ID order
#[instrument(skip(pool), fields(owner_id = %owner_id))]
pub fn list_items_by_owner(pool: &DbPool, owner_id: i32) -> Result<Vec<Item>> {
    debug!("Listing items by owner");

    let conn = &mut pool.get()?;

    let result = items::table
        .filter(items::owner_id.eq(owner_id))
        .order(items::id.asc())
        .select(Item::as_select())
        .load(conn)?;

    info!("Retrieved {} items", result.len());

    Ok(result)
}

/// Lists the items created in answer to any of the given item requests
#[instrument(skip(pool, request_ids), fields(count = request_ids.len()))]
pub fn list_items_by_requests(pool: &DbPool, request_ids: &[i32]) -> Result<Vec<Item>> {
    let conn = &mut pool.get()?;

    let result = items::table
        .filter(items::request_id.eq_any(request_ids))
        .order(items::id.asc())
        .select(Item::as_select())
        .load(conn)?;

    debug!("Found {} items answering requests", result.len());

    Ok(result)
}

/// Searches available items by name or description
///
/// Matching is a case-insensitive substring match. `%` and `_` in the
/// search text are matched literally.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `text` - The text to look for; must not be blank
///
/// ### Returns
///
/// A Result containing the matching items in ID order
#[instrument(skip(pool))]
pub fn search_items(pool: &DbPool, text: &str) -> Result<Vec<Item>> {
    debug!("Searching items");

    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = format!("%{}%", escaped.to_lowercase());

    let conn = &mut pool.get()?;

    let result = items::table
        .filter(items::available.eq(true))
        .filter(
            unicode_lower(items::name)
                .like(pattern.clone())
                .escape('\\')
                .or(unicode_lower(items::description).like(pattern).escape('\\')),
        )
        .order(items::id.asc())
        .select(Item::as_select())
        .load(conn)?;

    info!("Search matched {} items", result.len());

    Ok(result)
}

/// Updates an item in the database by its ID
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `item_id` - The ID of the item to update
/// * `name` - The new name, if it should change
/// * `description` - The new description, if it should change
/// * `available` - The new availability, if it should change
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The item is not found
#[instrument(skip(pool), fields(item_id = %item_id))]
pub fn update_item(
    pool: &DbPool,
    item_id: i32,
    name: Option<String>,
    description: Option<String>,
    available: Option<bool>,
) -> Result<Item> {
    debug!("Updating item by id");

    #[derive(AsChangeset)]
    #[diesel(table_name = items)]
    struct ItemChangeset {
        name: Option<String>,
        description: Option<String>,
        available: Option<bool>,
    }

    let conn = &mut pool.get()?;

    let item = if name.is_none() && description.is_none() && available.is_none() {
        items::table.find(item_id).select(Item::as_select()).first(conn)?
    } else {
        diesel::update(items::table.find(item_id))
            .set(ItemChangeset { name, description, available })
            .returning(Item::as_returning())
            .get_result(conn)?
    };

    info!("Successfully updated item");

    Ok(item)
}

/// Deletes an item by ID, together with its bookings and comments
///
/// ### Returns
///
/// The number of deleted item rows (0 or 1)
#[instrument(skip(pool), fields(item_id = %item_id))]
pub fn delete_item(pool: &DbPool, item_id: i32) -> Result<usize> {
    debug!("Deleting item");

    let conn = &mut pool.get()?;

    let deleted = diesel::delete(items::table.find(item_id)).execute(conn)?;

    info!("Deleted {} item rows", deleted);

    Ok(deleted)
}
