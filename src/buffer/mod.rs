//! Buffered bulk writer.
//!
//! [`BulkWriteBuffer`] collects documents for one collection and submits them
//! as a single bulk write once either threshold is reached:
//! - the document count reaches the configured limit (if enabled)
//! - the cumulative encoded size reaches `MAX_BATCH_BYTES`
//!
//! There is no timer. Anything below both thresholds stays buffered until the
//! caller flushes explicitly.

mod flush;

use serde::Serialize;

use crate::config::MAX_BATCH_BYTES;
use crate::document::Document;
use crate::error_handling::BufferError;
use crate::store::{Collection, WriteMode};

/// Buffered bulk inserter bound to one collection.
///
/// `insert` and `flush` take `&mut self`: one buffer serves one producer.
/// Producers that need parallelism use one buffer each.
///
/// # Examples
///
/// ```no_run
/// use bulk_write_buffer::{init_db_pool_with_path, BulkWriteBuffer, SqliteCollection};
/// use serde_json::json;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = init_db_pool_with_path("people.db".as_ref(), Duration::from_secs(30)).await?;
/// let people = SqliteCollection::create(pool.clone(), "people").await?;
///
/// let mut buffer = BulkWriteBuffer::new(people, 1000, true);
/// for i in 0..10_000 {
///     buffer.insert(&json!({"_id": i, "name": format!("person {i}")})).await?;
/// }
/// buffer.flush().await?;
/// pool.close().await;
/// # Ok(())
/// # }
/// ```
pub struct BulkWriteBuffer<C: Collection> {
    collection: C,
    pending: Vec<Document>,
    byte_count: usize,
    doc_limit: Option<usize>,
    byte_limit: usize,
    mode: WriteMode,
}

impl<C: Collection> BulkWriteBuffer<C> {
    /// Creates an empty buffer.
    ///
    /// A `doc_limit` of zero or less disables count-based flushing; size-based
    /// flushing always applies. `ordered` selects whether bulk writes stop at
    /// the first rejected document.
    pub fn new(collection: C, doc_limit: i64, ordered: bool) -> Self {
        let doc_limit = usize::try_from(doc_limit).ok().filter(|&limit| limit > 0);
        BulkWriteBuffer {
            collection,
            pending: Vec::with_capacity(doc_limit.unwrap_or(0).min(1024)),
            byte_count: 0,
            doc_limit,
            byte_limit: MAX_BATCH_BYTES,
            mode: WriteMode::from_ordered(ordered),
        }
    }

    /// Encodes `record` and buffers it, flushing if a threshold is reached.
    ///
    /// # Errors
    ///
    /// - `BufferError::Document` if the record cannot be encoded; nothing is buffered.
    /// - `BufferError::Flush` / `BufferError::Write` if the flush this record
    ///   triggered failed. The record was part of that batch.
    pub async fn insert<T: Serialize + ?Sized>(&mut self, record: &T) -> Result<(), BufferError> {
        let doc = Document::encode(record)?;
        self.insert_document(doc).await
    }

    /// Buffers an already encoded document, flushing if a threshold is reached.
    pub async fn insert_document(&mut self, doc: Document) -> Result<(), BufferError> {
        self.byte_count += doc.len();
        self.pending.push(doc);

        if self.should_flush() {
            log::trace!(
                "Threshold reached for {} ({} docs, {} bytes)",
                self.collection.namespace(),
                self.pending.len(),
                self.byte_count
            );
            self.flush().await?;
        }

        Ok(())
    }

    fn should_flush(&self) -> bool {
        self.doc_limit
            .is_some_and(|limit| self.pending.len() >= limit)
            || self.byte_count >= self.byte_limit
    }

    /// Number of documents currently buffered.
    pub fn doc_count(&self) -> usize {
        self.pending.len()
    }

    /// Encoded size of the buffered documents in bytes.
    pub fn byte_count(&self) -> usize {
        self.byte_count
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Count limit, or `None` when count-based flushing is disabled.
    pub fn doc_limit(&self) -> Option<usize> {
        self.doc_limit
    }

    /// Cumulative size at which the buffer flushes.
    pub fn byte_limit(&self) -> usize {
        self.byte_limit
    }

    /// Ordering used for every bulk write from this buffer.
    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Whether bulk writes stop at the first rejected document.
    pub fn is_ordered(&self) -> bool {
        self.mode.is_ordered()
    }

    /// Target collection handle.
    pub fn collection(&self) -> &C {
        &self.collection
    }
}

impl<C: Collection> Drop for BulkWriteBuffer<C> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            log::debug!(
                "Dropping buffer for {} with {} unflushed documents",
                self.collection.namespace(),
                self.pending.len()
            );
        }
    }
}
