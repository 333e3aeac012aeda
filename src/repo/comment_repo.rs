use crate::db::DbPool;
use crate::models::{Comment, NewComment, User};
use crate::schema::{comments, users};
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Stores a comment on an item
///
/// ### Errors
///
/// Returns an error if the item or author does not exist, or the insert fails.
#[instrument(skip(pool, new_comment), fields(item_id = %new_comment.item_id, author_id = %new_comment.author_id))]
pub fn create_comment(pool: &DbPool, new_comment: NewComment) -> Result<Comment> {
    debug!("Creating new comment");

    let conn = &mut pool.get()?;

    let comment = diesel::insert_into(comments::table)
        .values(&new_comment)
        .returning(Comment::as_returning())
        .get_result(conn)?;

    info!("Successfully created comment with id: {}", comment.get_id());

    Ok(comment)
}

/// Lists the comments on any of the given items, with their authors
///
/// ### Returns
///
/// Pairs of comment and author, oldest comment first
#[instrument(skip(pool, item_ids), fields(count = item_ids.len()))]
pub fn list_comments_for_items(pool: &DbPool, item_ids: &[i32]) -> Result<Vec<(Comment, User)>> {
    debug!("Listing comments for items");

    let conn = &mut pool.get()?;

    let result = comments::table
        .inner_join(users::table)
        .filter(comments::item_id.eq_any(item_ids))
        .order((comments::created.asc(), comments::id.asc()))
        .select((Comment::as_select(), User::as_select()))
        .load(conn)?;

    debug!("Found {} comments", result.len());

    Ok(result)
}
