//! bulk_write_buffer library: buffered bulk inserts into a document store
//!
//! The core type is [`BulkWriteBuffer`]. It accumulates documents for one
//! collection and submits them as a single bulk write when either the document
//! count limit or the byte-size ceiling is reached, or when the caller flushes
//! explicitly. A failed bulk write is reported to the caller and never retried.
//!
//! The store is reached through the [`Collection`] and [`BulkOperation`]
//! traits; [`SqliteCollection`] implements them on top of `sqlx`.
//!
//! # Example
//!
//! ```no_run
//! use bulk_write_buffer::{BulkWriteBuffer, SqliteCollection, init_db_pool_with_path};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = init_db_pool_with_path("events.db".as_ref(), Duration::from_secs(30)).await?;
//! let events = SqliteCollection::create(pool.clone(), "events").await?;
//!
//! let mut buffer = BulkWriteBuffer::new(events, 500, false);
//! buffer.insert(&json!({"_id": "e1", "kind": "click"})).await?;
//! buffer.flush().await?;
//! pool.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

#![warn(missing_docs)]

mod app;
mod buffer;
pub mod config;
mod document;
mod error_handling;
pub mod initialization;
pub mod store;

// Re-export public API
pub use buffer::BulkWriteBuffer;
pub use config::{Config, LogFormat, LogLevel};
pub use document::{Document, ID_FIELD};
pub use error_handling::{BufferError, DocumentError, InitializationError, StoreError};
pub use run::{exit_code, run_import, ImportReport};
pub use store::{
    init_db_pool_with_path, BulkOperation, BulkWriteResult, Collection, SqliteCollection,
    WriteError, WriteFailure, WriteMode,
};

// Internal run module (contains the JSON-lines import logic)
mod run {
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use anyhow::{Context, Result};
    use log::{info, warn};
    use sqlx::SqlitePool;

    use crate::app::{log_progress, open_input};
    use crate::buffer::BulkWriteBuffer;
    use crate::config::{Config, LOGGING_INTERVAL};
    use crate::document::Document;
    use crate::error_handling::BufferError;
    use crate::store::{init_db_pool_with_path, SqliteCollection};

    /// Results of an import run.
    #[derive(Debug, Clone)]
    pub struct ImportReport {
        /// Input lines consumed, including blank and invalid ones
        pub lines_read: usize,
        /// Blank lines skipped
        pub blank_lines: usize,
        /// Lines that were not a JSON object and never reached the buffer
        pub invalid_lines: usize,
        /// Documents the store applied
        pub inserted: usize,
        /// Documents lost in failed or partially failed bulk writes
        pub failed: usize,
        /// Bulk writes that reported an error
        pub batches_failed: usize,
        /// Path to the SQLite database
        pub db_path: PathBuf,
        /// Target collection
        pub collection: String,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    impl ImportReport {
        /// True when every non-blank line was inserted.
        pub fn is_clean(&self) -> bool {
            self.invalid_lines == 0 && self.failed == 0
        }
    }

    /// Process exit code for the outcome of [`run_import`].
    ///
    /// `0` when every non-blank line was inserted, `2` when the import finished
    /// with invalid lines or failed documents, `1` when it aborted.
    pub fn exit_code(outcome: &Result<ImportReport>) -> i32 {
        match outcome {
            Ok(report) if report.is_clean() => 0,
            Ok(_) => 2,
            Err(_) => 1,
        }
    }

    /// Counters kept while streaming input through the buffer.
    #[derive(Default)]
    struct Tally {
        lines_read: usize,
        blank_lines: usize,
        invalid_lines: usize,
        buffered: usize,
        failed: usize,
        batches_failed: usize,
    }

    impl Tally {
        /// Documents applied so far, excluding those still buffered.
        fn inserted(&self, still_buffered: usize) -> usize {
            self.buffered - self.failed - still_buffered
        }

        fn record_batch_error(&mut self, err: &BufferError) {
            self.batches_failed += 1;
            self.failed += err.attempted() - err.inserted() as usize;
        }
    }

    /// Imports JSON-lines documents into a SQLite collection.
    ///
    /// Reads one JSON object per line from `config.file` (or stdin), streams the
    /// documents through a single [`BulkWriteBuffer`] and flushes the final
    /// partial batch at end of input. The pool is closed before returning.
    ///
    /// Without `stop_on_error`, invalid lines and failed batches are logged,
    /// counted in the report and skipped.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The database cannot be opened or the collection cannot be created
    /// - The input cannot be opened or read
    /// - `stop_on_error` is set and a line is invalid or a batch fails
    pub async fn run_import(config: Config) -> Result<ImportReport> {
        let start_time = Instant::now();

        let pool = init_db_pool_with_path(
            &config.db_path,
            Duration::from_secs(config.timeout_seconds),
        )
        .await
        .context("Failed to initialize database pool")?;

        let outcome = import_into(&pool, &config, start_time).await;
        pool.close().await;
        let tally = outcome?;

        let report = ImportReport {
            lines_read: tally.lines_read,
            blank_lines: tally.blank_lines,
            invalid_lines: tally.invalid_lines,
            inserted: tally.inserted(0),
            failed: tally.failed,
            batches_failed: tally.batches_failed,
            db_path: config.db_path.clone(),
            collection: config.collection.clone(),
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        };
        info!(
            "Import into {} finished: {} inserted, {} failed, {} invalid lines",
            report.collection, report.inserted, report.failed, report.invalid_lines
        );
        Ok(report)
    }

    async fn import_into(pool: &SqlitePool, config: &Config, start_time: Instant) -> Result<Tally> {
        let mut collection = SqliteCollection::create(pool.clone(), &config.collection)
            .await
            .with_context(|| format!("Failed to open collection {}", config.collection))?;
        if config.drop {
            collection.drop_collection().await?;
            collection = SqliteCollection::create(pool.clone(), &config.collection).await?;
        }

        let mut buffer = BulkWriteBuffer::new(collection, config.batch_size, !config.unordered);
        info!(
            "Importing into {} ({} writes, batch size {})",
            config.collection,
            buffer.mode(),
            buffer
                .doc_limit()
                .map_or_else(|| "unlimited".to_string(), |limit| limit.to_string())
        );

        let input_path = config.input_path().map(PathBuf::as_path);
        let mut lines = open_input(input_path).await?;
        let mut tally = Tally::default();
        let mut last_log = Instant::now();

        while let Some(line) = lines.next_line().await.context("Failed to read input")? {
            tally.lines_read += 1;
            let line = line.trim();
            if line.is_empty() {
                tally.blank_lines += 1;
                continue;
            }

            let doc = match Document::parse(line) {
                Ok(doc) => doc,
                Err(e) if config.stop_on_error => {
                    return Err(e).with_context(|| format!("Invalid document on line {}", tally.lines_read));
                }
                Err(e) => {
                    warn!("Skipping line {}: {}", tally.lines_read, e);
                    tally.invalid_lines += 1;
                    continue;
                }
            };

            tally.buffered += 1;
            if let Err(e) = buffer.insert_document(doc).await {
                handle_batch_error(&mut tally, e, config.stop_on_error)?;
            }

            if last_log.elapsed() >= Duration::from_secs(LOGGING_INTERVAL) {
                log_progress(
                    start_time,
                    tally.lines_read,
                    tally.inserted(buffer.doc_count()),
                );
                last_log = Instant::now();
            }
        }

        if let Err(e) = buffer.flush().await {
            handle_batch_error(&mut tally, e, config.stop_on_error)?;
        }

        Ok(tally)
    }

    fn handle_batch_error(tally: &mut Tally, err: BufferError, stop_on_error: bool) -> Result<()> {
        tally.record_batch_error(&err);
        if stop_on_error {
            return Err(err).context("Import stopped after a failed bulk write");
        }
        warn!("{}", err);
        if let Some(errors) = err.write_errors() {
            for write_error in errors {
                warn!("  rejected {}", write_error);
            }
        }
        Ok(())
    }
}
