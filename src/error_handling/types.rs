//! Error type definitions.
//!
//! This module defines the admission, store and buffer error types used
//! throughout the crate.

use log::SetLoggerError;
use thiserror::Error;

use crate::store::{WriteError, WriteFailure, WriteMode};

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// A record that cannot be admitted into a buffer.
///
/// Returned before the record is appended, so the buffer is left untouched.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The value could not be encoded as JSON.
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    /// The value encoded to something other than a JSON object.
    #[error("document must be a JSON object, got {kind}")]
    NotAnObject {
        /// JSON kind of the rejected value (`array`, `string`, ...)
        kind: &'static str,
    },

    /// The encoded document exceeds the per-document ceiling.
    #[error("document of {size} bytes exceeds the maximum of {max} bytes")]
    TooLarge {
        /// Encoded size in bytes
        size: usize,
        /// Maximum allowed size in bytes
        max: usize,
    },
}

/// Error types for store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreation(String),

    /// The collection name cannot be used as a table name.
    #[error("invalid collection name {0:?}")]
    InvalidCollectionName(String),

    /// The store could not be reached or the statement could not be run at all.
    #[error("SQL error: {0}")]
    Transport(#[from] sqlx::Error),

    /// The store applied part of a bulk write and rejected the rest.
    #[error("{0}")]
    Write(WriteFailure),
}

/// Errors returned by [`crate::BulkWriteBuffer`].
#[derive(Error, Debug)]
pub enum BufferError {
    /// The record was rejected at admission.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The whole bulk write failed; none of its documents are known to be applied.
    #[error("bulk write of {attempted} documents to {namespace} failed: {source}")]
    Flush {
        /// Target collection
        namespace: String,
        /// Number of documents in the failed batch
        attempted: usize,
        /// Underlying store error
        #[source]
        source: StoreError,
    },

    /// The store rejected some documents of the batch.
    ///
    /// In ordered mode the first rejection stopped the batch and every later
    /// document was not applied (`failure.skipped`). In unordered mode only the
    /// listed documents failed.
    #[error("{mode} bulk write of {attempted} documents to {namespace} partially failed: {failure}")]
    Write {
        /// Target collection
        namespace: String,
        /// Number of documents in the batch
        attempted: usize,
        /// Ordering the batch was written with
        mode: WriteMode,
        /// Per-document detail reported by the store
        failure: WriteFailure,
    },
}

impl BufferError {
    /// Per-document rejections, when the store reported them.
    pub fn write_errors(&self) -> Option<&[WriteError]> {
        match self {
            BufferError::Write { failure, .. } => Some(&failure.errors),
            _ => None,
        }
    }

    /// Number of documents in the batch this error refers to.
    ///
    /// Zero for admission errors, which never reach the store.
    pub fn attempted(&self) -> usize {
        match self {
            BufferError::Document(_) => 0,
            BufferError::Flush { attempted, .. } | BufferError::Write { attempted, .. } => {
                *attempted
            }
        }
    }

    /// Number of documents from the batch that the store applied.
    pub fn inserted(&self) -> u64 {
        match self {
            BufferError::Write { failure, .. } => failure.inserted,
            _ => 0,
        }
    }
}
