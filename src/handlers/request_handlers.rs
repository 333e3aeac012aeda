use axum::{extract::State, Json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::db::DbPool;
use crate::dto::{CreateItemRequestDto, ItemRequestDto, PageQuery};
use crate::errors::ApiError;
use crate::extract::{Path, SharerId, ValidatedJson, ValidatedQuery};
use crate::models::{Item, ItemRequest, NewItemRequest};
use crate::repo;

use super::{find_item_request, find_user};

/// Pairs each request with the items listed in answer to it
fn with_items(pool: &DbPool, requests: Vec<ItemRequest>) -> Result<Vec<ItemRequestDto>, ApiError> {
    let request_ids: Vec<i32> = requests.iter().map(|r| r.get_id()).collect();

    let mut items_by_request: HashMap<i32, Vec<Item>> = HashMap::new();
    for item in repo::list_items_by_requests(pool, &request_ids).map_err(ApiError::Database)? {
        if let Some(request_id) = item.get_request_id() {
            items_by_request.entry(request_id).or_default().push(item);
        }
    }

    Ok(requests
        .iter()
        .map(|request| {
            let items = items_by_request.remove(&request.get_id()).unwrap_or_default();
            ItemRequestDto::new(request, items)
        })
        .collect())
}

/// Handler for posting a new item request
///
/// This function handles POST requests to `/requests`.
#[instrument(skip(pool, payload), fields(requester_id = %requester_id))]
pub async fn create_request_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(requester_id): SharerId,
    ValidatedJson(payload): ValidatedJson<CreateItemRequestDto>,
) -> Result<Json<ItemRequestDto>, ApiError> {
    info!("Creating item request");

    find_user(&pool, requester_id)?;

    let request = repo::create_item_request(&pool, NewItemRequest::new(payload.description, requester_id))
        .map_err(ApiError::Database)?;

    info!("Successfully created item request with id: {}", request.get_id());

    Ok(Json(ItemRequestDto::new(&request, Vec::new())))
}

/// Handler for listing the acting user's own requests
///
/// This function handles GET requests to `/requests`.
#[instrument(skip(pool), fields(requester_id = %requester_id))]
pub async fn list_own_requests_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(requester_id): SharerId,
) -> Result<Json<Vec<ItemRequestDto>>, ApiError> {
    debug!("Listing own item requests");

    find_user(&pool, requester_id)?;

    let requests = repo::list_requests_by_requester(&pool, requester_id).map_err(ApiError::Database)?;
    let dtos = with_items(&pool, requests)?;

    info!("Retrieved {} item requests", dtos.len());

    Ok(Json(dtos))
}

/// Handler for browsing other users' requests
///
/// This function handles GET requests to `/requests/all?from=...&size=...`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user_id` - The acting user, whose own requests are left out
/// * `page` - The offset and page size
#[instrument(skip(pool, page), fields(user_id = %user_id, from = %page.from, size = %page.size))]
pub async fn list_other_requests_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(user_id): SharerId,
    ValidatedQuery(page): ValidatedQuery<PageQuery>,
) -> Result<Json<Vec<ItemRequestDto>>, ApiError> {
    debug!("Listing other users' item requests");

    find_user(&pool, user_id)?;

    let requests = repo::list_other_requests(&pool, user_id, page.from, page.size).map_err(ApiError::Database)?;
    let dtos = with_items(&pool, requests)?;

    info!("Retrieved {} item requests", dtos.len());

    Ok(Json(dtos))
}

/// Handler for retrieving a specific request with its items
///
/// This function handles GET requests to `/requests/{id}`.
#[instrument(skip(pool), fields(user_id = %user_id, request_id = %request_id))]
pub async fn get_request_handler(
    State(pool): State<Arc<DbPool>>,
    SharerId(user_id): SharerId,
    Path(request_id): Path<i32>,
) -> Result<Json<ItemRequestDto>, ApiError> {
    debug!("Retrieving item request");

    find_user(&pool, user_id)?;
    let request = find_item_request(&pool, request_id)?;

    let dto = with_items(&pool, vec![request])?
        .pop()
        .ok_or_else(|| ApiError::NotFound(format!("Item request with id {} not found", request_id)))?;

    Ok(Json(dto))
}
