use axum::{extract::State, Json};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::db::DbPool;
use crate::dto::{
    BookingShortDto, CommentDto, CreateCommentDto, CreateItemDto, ItemDetailsDto, SearchQuery, UpdateItemDto,
};
use crate::errors::ApiError;
use crate::extract::{Path, SharerId, ValidatedJson, ValidatedQuery};
use crate::models::{Item, NewComment, NewItem};
use crate::repo;

use super::{current_time, find_item, find_item_request, find_user};

/// Attaches comments and, for items the viewer owns, neighbouring bookings
fn item_details(
    pool: &DbPool,
    items: Vec<Item>,
    viewer_id: i32,
    now: NaiveDateTime,
) -> Result<Vec<ItemDetailsDto>, ApiError> {
    let item_ids: Vec<i32> = items.iter().map(|item| item.get_id()).collect();

    let mut comments_by_item: HashMap<i32, Vec<CommentDto>> = HashMap::new();
    for (comment, author) in repo::list_comments_for_items(pool, &item_ids).map_err(ApiError::Database)? {
        comments_by_item
            .entry(comment.get_item_id())
            .or_default()
            .push(CommentDto::new(&comment, &author));
    }

    items
        .into_iter()
        .map(|item| {
            let (last, next) = if item.is_owned_by(viewer_id) {
                repo::neighbouring_bookings(pool, item.get_id(), now).map_err(ApiError::Database)?
            } else {
                (None, None)
            };
            let comments = comments_by_item.remove(&item.get_id()).unwrap_or_default();

            Ok(ItemDetailsDto {
                item,
                last_booking: last.as_ref().map(BookingShortDto::from),
                next_booking: next.as_ref().map(BookingShortDto::from),
                comments,
            })
        })
        .collect()
}

/// Handler for listing a new item
///
/// This function handles POST requests to `/items`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `owner_id` - The acting user, who will own the item
/// * `payload` - The validated item fields
///
/// ### Returns
///
/// The newly created item as JSON
#[instrument(skip(pool, payload), fields(owner_id = %owner_id, name = %payload.name))]
pub async fn create_item_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(owner_id): SharerId,
    ValidatedJson(payload): ValidatedJson<CreateItemDto>,
) -> Result<Json<Item>, ApiError> {
    info!("Creating new item");

    find_user(&pool, owner_id)?;
    if let Some(request_id) = payload.request_id {
        find_item_request(&pool, request_id)?;
    }

    let new_item = NewItem {
        name: payload.name,
        description: payload.description,
        available: payload.available,
        owner_id,
        request_id: payload.request_id,
    };
    let item = repo::create_item(&pool, new_item).map_err(ApiError::Database)?;

    info!("Successfully created item with id: {}", item.get_id());

    Ok(Json(item))
}

/// Handler for partially updating an item
///
/// This function handles PATCH requests to `/items/{id}`. Only the owner
/// may update an item.
#[instrument(skip(pool, payload), fields(user_id = %user_id, item_id = %item_id))]
pub async fn update_item_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(user_id): SharerId,
    Path(item_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateItemDto>,
) -> Result<Json<Item>, ApiError> {
    info!("Updating item");

    find_user(&pool, user_id)?;
    let item = find_item(&pool, item_id)?;
    if !item.is_owned_by(user_id) {
        return Err(ApiError::AccessDenied(format!("User {} does not own item {}", user_id, item_id)));
    }

    let item = repo::update_item(&pool, item_id, payload.name, payload.description, payload.available)
        .map_err(ApiError::Database)?;

    info!("Successfully updated item with id: {}", item.get_id());

    Ok(Json(item))
}

/// Handler for retrieving a specific item with its comments
///
/// This function handles GET requests to `/items/{id}`. The last and next
/// approved bookings are only filled in when the viewer owns the item.
#[instrument(skip(pool), fields(user_id = %user_id, item_id = %item_id))]
pub async fn get_item_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(user_id): SharerId,
    Path(item_id): Path<i32>,
) -> Result<Json<ItemDetailsDto>, ApiError> {
    debug!("Retrieving item");

    let item = find_item(&pool, item_id)?;

    let details = item_details(&pool, vec![item], user_id, current_time())?
        .pop()
        .ok_or_else(|| ApiError::NotFound(format!("Item with id {} not found", item_id)))?;

    Ok(Json(details))
}

/// Handler for listing the acting user's items
///
/// This function handles GET requests to `/items`.
#[instrument(skip(pool), fields(owner_id = %owner_id))]
pub async fn list_items_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(owner_id): SharerId,
) -> Result<Json<Vec<ItemDetailsDto>>, ApiError> {
    debug!("Listing items of owner");

    find_user(&pool, owner_id)?;
    let items = repo::list_items_by_owner(&pool, owner_id).map_err(ApiError::Database)?;
    let details = item_details(&pool, items, owner_id, current_time())?;

    info!("Retrieved {} items", details.len());

    Ok(Json(details))
}

/// Handler for searching available items
///
/// This function handles GET requests to `/items/search?text=...`. Blank
/// search text matches nothing.
#[instrument(skip(pool, query), fields(text = %query.text))]
pub async fn search_items_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedQuery(query): ValidatedQuery<SearchQuery>,
) -> Result<Json<Vec<Item>>, ApiError> {
    debug!("Searching items");

    if query.text.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let items = repo::search_items(&pool, &query.text).map_err(ApiError::Database)?;

    info!("Search returned {} items", items.len());

    Ok(Json(items))
}

/// Handler for deleting an item
///
/// This function handles DELETE requests to `/items/{id}`. Items belonging
/// to someone else are reported as not found.
#[instrument(skip(pool), fields(user_id = %user_id, item_id = %item_id))]
pub async fn delete_item_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(user_id): SharerId,
    Path(item_id): Path<i32>,
) -> Result<Json<()>, ApiError> {
    info!("Deleting item");

    find_user(&pool, user_id)?;
    let item = find_item(&pool, item_id)?;
    if !item.is_owned_by(user_id) {
        return Err(ApiError::NotFound(format!("User {} has no item with id {}", user_id, item_id)));
    }

    repo::delete_item(&pool, item_id).map_err(ApiError::Database)?;

    info!("Successfully deleted item with id: {}", item_id);

    Ok(Json(()))
}

/// Handler for commenting on an item
///
/// This function handles POST requests to `/items/{id}/comment`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `author_id` - The acting user
/// * `item_id` - The item being commented on
/// * `payload` - The comment text
///
/// ### Returns
///
/// The stored comment with its author's name, or 400 if the author has not
/// finished an approved booking of the item
#[instrument(skip(pool, payload), fields(author_id = %author_id, item_id = %item_id))]
pub async fn add_comment_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(author_id): SharerId,
    Path(item_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CreateCommentDto>,
) -> Result<Json<CommentDto>, ApiError> {
    info!("Adding comment");

    let author = find_user(&pool, author_id)?;
    find_item(&pool, item_id)?;

    let rented = repo::has_completed_booking(&pool, item_id, author_id, current_time())
        .map_err(ApiError::Database)?;
    if !rented {
        return Err(ApiError::Validation(format!(
            "User {} has not completed a booking of item {}",
            author_id, item_id
        )));
    }

    let comment = repo::create_comment(&pool, NewComment::new(payload.text, item_id, author_id))
        .map_err(ApiError::Database)?;

    info!("Successfully added comment with id: {}", comment.get_id());

    Ok(Json(CommentDto::new(&comment, &author)))
}
