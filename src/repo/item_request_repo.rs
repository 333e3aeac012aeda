use crate::db::DbPool;
use crate::models::{ItemRequest, NewItemRequest};
use crate::schema::item_requests;
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Creates a new item request in the database
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `new_request` - The description and requester, stamped with its creation time
///
/// ### Errors
///
/// Returns an error if the requester does not exist or the insert fails.
#[instrument(skip(pool, new_request), fields(requester_id = %new_request.requester_id))]
pub fn create_item_request(pool: &DbPool, new_request: NewItemRequest) -> Result<ItemRequest> {
    debug!("Creating new item request");

    let conn = &mut pool.get()?;

    let request = diesel::insert_into(item_requests::table)
        .values(&new_request)
        .returning(ItemRequest::as_returning())
        .get_result(conn)?;

    info!("Successfully created item request with id: {}", request.get_id());

    Ok(request)
}

/// Retrieves an item request by ID
#[instrument(skip(pool), fields(request_id = %request_id))]
pub fn get_item_request(pool: &DbPool, request_id: i32) -> Result<Option<ItemRequest>> {
    debug!("Retrieving item request by id");

    let conn = &mut pool.get()?;

    let result = item_requests::table
        .find(request_id)
        .select(ItemRequest::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists a user's own item requests, oldest first
#[instrument(skip(pool), fields(requester_id = %requester_id))]
pub fn list_requests_by_requester(pool: &DbPool, requester_id: i32) -> Result<Vec<ItemRequest>> {
    debug!("Listing item requests by requester");

    let conn = &mut pool.get()?;

    let result = item_requests::table
        .filter(item_requests::requester_id.eq(requester_id))
        .order((item_requests::created.asc(), item_requests::id.asc()))
        .select(ItemRequest::as_select())
        .load(conn)?;

    info!("Retrieved {} item requests", result.len());

    Ok(result)
}

/// Lists one page of the item requests made by everyone except a user
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `excluded_requester_id` - The user whose own requests are left out
/// * `from` - How many requests to skip
/// * `size` - The maximum number of requests to return
///
/// ### Returns
///
/// The requests of the page, oldest first
#[instrument(skip(pool), fields(excluded_requester_id = %excluded_requester_id, from = %from, size = %size))]
pub fn list_other_requests(pool: &DbPool, excluded_requester_id: i32, from: i64, size: i64) -> Result<Vec<ItemRequest>> {
    debug!("Listing other users' item requests");

    let conn = &mut pool.get()?;

    let result = item_requests::table
        .filter(item_requests::requester_id.ne(excluded_requester_id))
        .order((item_requests::created.asc(), item_requests::id.asc()))
        .offset(from)
        .limit(size)
        .select(ItemRequest::as_select())
        .load(conn)?;

    info!("Retrieved {} item requests", result.len());

    Ok(result)
}
