use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Opens the SQLite connection pool described by `settings`.
///
/// The pool is the one storage handle of the application. It is built once at
/// startup and handed to the repository; each repository call borrows a
/// connection only for the statement it runs.
pub async fn connect(settings: &DatabaseSettings) -> Result<SqlitePool, DbError> {
    if settings.url.trim().is_empty() {
        return Err(DbError::ConnectionConfigError(
            "database.url must be set.".to_string(),
        ));
    }

    // Make sure the parent directory of a file-backed database exists.
    if let Some(db_path) = settings.url.strip_prefix("sqlite://") {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DbError::ConnectionConfigError(e.to_string()))?;
            }
        }
    }

    let options = SqliteConnectOptions::from_str(&settings.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .log_statements(tracing::log::LevelFilter::Debug);

    // An in-memory database lives and dies with its connection, so it must
    // never be recycled and never be shared across more than one connection.
    let max_connections = if is_in_memory(&settings.url) {
        if settings.max_connections > 1 {
            tracing::warn!(
                requested = settings.max_connections,
                "In-memory database limited to a single connection."
            );
        }
        1
    } else {
        settings.max_connections
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    tracing::info!(url = %settings.url, "Connected to the database.");
    Ok(pool)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Applies the embedded migrations, bringing the schema up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
