//! Batch flushing logic.

use crate::error_handling::{BufferError, StoreError};
use crate::store::{BulkOperation, BulkWriteResult, Collection, WriteMode};

use super::BulkWriteBuffer;

impl<C: Collection> BulkWriteBuffer<C> {
    /// Submits every buffered document as one bulk write.
    ///
    /// An empty buffer returns immediately without contacting the store.
    /// Otherwise the buffer is emptied before the write runs and stays empty
    /// whatever the outcome: a failed batch is reported, never retried or
    /// re-buffered, since the store may already have applied part of it.
    ///
    /// # Errors
    ///
    /// - `BufferError::Flush` when the bulk write failed as a whole.
    /// - `BufferError::Write` when the store rejected some documents. In
    ///   ordered mode the documents after the first rejection were not applied.
    pub async fn flush(&mut self) -> Result<BulkWriteResult, BufferError> {
        if self.pending.is_empty() {
            return Ok(BulkWriteResult::default());
        }

        let docs = std::mem::take(&mut self.pending);
        let bytes = std::mem::take(&mut self.byte_count);
        let attempted = docs.len();
        let namespace = self.collection.namespace().to_string();

        log::debug!(
            "Flushing batch of {} documents ({} bytes) to {}",
            attempted,
            bytes,
            namespace
        );

        let mut bulk = self.collection.bulk();
        if self.mode == WriteMode::Unordered {
            bulk.unordered();
        }
        for doc in docs {
            bulk.insert(doc);
        }

        match bulk.run().await {
            Ok(result) => {
                log::debug!(
                    "Successfully flushed {} documents to {}",
                    result.inserted,
                    namespace
                );
                Ok(result)
            }
            Err(StoreError::Write(failure)) => Err(BufferError::Write {
                namespace,
                attempted,
                mode: self.mode,
                failure,
            }),
            Err(source) => Err(BufferError::Flush {
                namespace,
                attempted,
                source,
            }),
        }
    }
}
