use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// How long a connection waits on SQLite's write lock before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

diesel::define_sql_function! {
    /// Lowercases text with full Unicode case folding
    ///
    /// SQLite's built-in `lower` and `LIKE` only fold ASCII letters.
    fn unicode_lower(text: Text) -> Text;
}

/// Applies per-connection pragmas and functions to every connection the pool opens
///
/// SQLite only enforces foreign keys (and the cascades the migrations
/// declare) when `foreign_keys` is switched on for the connection, so this
/// cannot be done once at startup.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            BUSY_TIMEOUT.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)?;

        unicode_lower_utils::register_impl(conn, |text: String| text.to_lowercase())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds the connection pool for the given database URL
///
/// ### Errors
///
/// Returns an error if the pool cannot open its initial connections.
pub fn init_pool(database_url: &str) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
}
