//! Configuration constants.
//!
//! This module defines the size limits, defaults and timing parameters used by
//! the write buffer, the SQLite store and the loader.

// Document and batch size limits
/// Maximum encoded size of a single document in bytes (16MB)
/// Documents larger than this are rejected at admission and never buffered
pub const MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;
/// Cumulative encoded size at which a buffer flushes automatically (16MB)
/// Matches the per-document ceiling, so a batch never grows past twice this value
pub const MAX_BATCH_BYTES: usize = 16 * 1024 * 1024;

// Loader defaults
/// Default number of documents buffered before a bulk write is issued
pub const DEFAULT_BATCH_SIZE: i64 = 1000;
/// Default target collection name
pub const DEFAULT_COLLECTION: &str = "documents";
/// Default SQLite database file
pub const DEFAULT_DB_PATH: &str = "./bulk_write_buffer.db";
/// Minimum number of seconds between progress log lines
pub const LOGGING_INTERVAL: u64 = 5;

// Database timing
/// Seconds to wait for a pooled connection before a bulk write fails
pub const DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;
