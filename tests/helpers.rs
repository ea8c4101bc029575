// Shared test helpers for database setup and test data creation.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::io::Write;
use std::path::Path;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tempfile::NamedTempFile;

/// Creates an in-memory database pool.
/// A single connection keeps every query on the same in-memory database.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool")
}

/// Opens a single-connection pool on a database file, creating it if needed.
/// Writers sharing the pool take turns instead of contending for the SQLite lock.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool_with_path(db_path: &Path) -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite:{}?mode=rwc", db_path.to_string_lossy()))
        .await
        .expect("Failed to create test database")
}

/// Writes the given lines to a temporary JSON-lines file.
#[allow(dead_code)] // Used by other test files
pub fn write_jsonl<S: AsRef<str>>(lines: &[S]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for line in lines {
        writeln!(file, "{}", line.as_ref()).expect("Failed to write line");
    }
    file.flush().expect("Failed to flush temp file");
    file
}
