//! Database connection pool management.
//!
//! This module initializes and configures the SQLite connection pool with:
//! - WAL mode enabled for concurrent access
//! - Connection acquire timeout
//! - Automatic database file creation

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use log::{error, info};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::error_handling::StoreError;

/// Initializes and returns a database connection pool for the file at `db_path`.
///
/// Creates the database file if it doesn't exist and enables WAL mode
/// for better concurrent access. Acquiring a connection waits at most
/// `acquire_timeout`; a bulk write that cannot get a connection in time fails
/// as a whole.
///
/// The caller owns the pool and is responsible for closing it once every
/// buffer writing through it has flushed.
pub async fn init_db_pool_with_path(
    db_path: &Path,
    acquire_timeout: Duration,
) -> Result<SqlitePool, StoreError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Database file created successfully."),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Database file already exists.")
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(StoreError::FileCreation(e.to_string()));
        }
    }

    let pool = SqlitePoolOptions::new()
        .acquire_timeout(acquire_timeout)
        .connect(&format!("sqlite:{}", db_path_str))
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            StoreError::Transport(e)
        })?;

    // Enable WAL mode
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            StoreError::Transport(e)
        })?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_missing_database_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("fresh.db");
        assert!(!path.exists());

        let pool = init_db_pool_with_path(&path, Duration::from_secs(5))
            .await
            .expect("pool");
        assert!(path.exists());

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .expect("journal mode");
        assert_eq!(mode.to_lowercase(), "wal");
        pool.close().await;
    }

    #[tokio::test]
    async fn test_reuses_existing_database_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("existing.db");

        let pool = init_db_pool_with_path(&path, Duration::from_secs(5))
            .await
            .expect("first open");
        sqlx::query("CREATE TABLE marker (x INTEGER)")
            .execute(&pool)
            .await
            .expect("create marker");
        pool.close().await;

        let pool = init_db_pool_with_path(&path, Duration::from_secs(5))
            .await
            .expect("second open");
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='marker'",
        )
        .fetch_one(&pool)
        .await
        .expect("lookup");
        assert_eq!(count, 1);
        pool.close().await;
    }

    #[tokio::test]
    async fn test_unwritable_path_is_file_creation_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("missing_dir").join("db.sqlite");
        let err = init_db_pool_with_path(&path, Duration::from_secs(5))
            .await
            .expect_err("parent directory does not exist");
        assert!(matches!(err, StoreError::FileCreation(_)));
    }
}
