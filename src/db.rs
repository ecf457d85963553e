//! Database connection pool and migration management.

use sqlx::{Pool, Sqlite, sqlite::SqlitePoolOptions};

/// Type alias for the SQLite connection pool.
pub type DbPool = Pool<Sqlite>;

/// Create a new SQLite connection pool.
///
/// A connection pool maintains multiple database connections that can be
/// reused across HTTP requests.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string, e.g. `sqlite:licensing.db?mode=rwc`
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the database
/// file cannot be opened.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        // Limit concurrent connections
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are embedded at compile time and tracked in the
/// `_sqlx_migrations` table, so each migration runs only once.
///
/// # Errors
///
/// Returns an error on SQL errors or a checksum mismatch against an
/// already-applied migration.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}
