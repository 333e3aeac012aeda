/// Repository module
///
/// This module provides the data access layer for the application.
/// Every function borrows a pooled connection for the duration of its
/// queries and reports failures as `anyhow::Error`; deciding which failures
/// are the client's fault is left to the handlers.

mod user_repo;
mod item_repo;
mod booking_repo;
mod item_request_repo;
mod comment_repo;

// Re-export all repository functions
pub use user_repo::*;
pub use item_repo::*;
pub use booking_repo::*;
pub use item_request_repo::*;
pub use comment_repo::*;
