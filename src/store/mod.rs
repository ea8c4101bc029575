//! Document store interface.
//!
//! The buffer talks to its store only through two traits:
//! - [`Collection`]: a handle on a target collection that can start bulk operations
//! - [`BulkOperation`]: a one-shot builder that collects inserts and runs them
//!
//! The handle's connection is owned by the caller. A SQLite implementation
//! lives in [`sqlite`].

pub mod pool;
pub mod sqlite;
#[cfg(test)]
pub(crate) mod test_helpers;

use std::fmt;

use async_trait::async_trait;

use crate::document::Document;
use crate::error_handling::StoreError;

pub use pool::init_db_pool_with_path;
pub use sqlite::{SqliteBulk, SqliteCollection};

/// How a bulk write reacts to a rejected document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Stop at the first rejected document; later documents are not applied.
    #[default]
    Ordered,
    /// Keep going past rejected documents.
    Unordered,
}

impl WriteMode {
    /// `Ordered` for `true`, `Unordered` for `false`.
    pub fn from_ordered(ordered: bool) -> Self {
        if ordered {
            WriteMode::Ordered
        } else {
            WriteMode::Unordered
        }
    }

    /// Whether writes stop at the first rejected document.
    pub fn is_ordered(self) -> bool {
        self == WriteMode::Ordered
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Ordered => f.write_str("ordered"),
            WriteMode::Unordered => f.write_str("unordered"),
        }
    }
}

/// Outcome of a bulk write that applied every document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkWriteResult {
    /// Number of documents inserted
    pub inserted: u64,
}

/// A single document the store refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteError {
    /// Position of the document within its batch
    pub index: usize,
    /// The document's `_id`, if it had one
    pub id: Option<String>,
    /// Store-specific error code (SQLite extended result code)
    pub code: Option<String>,
    /// Store-reported reason
    pub message: String,
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index {}", self.index)?;
        if let Some(id) = &self.id {
            write!(f, " (_id {id})")?;
        }
        if let Some(code) = &self.code {
            write!(f, " [code {code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// A bulk write that was applied only in part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    /// Documents the store applied
    pub inserted: u64,
    /// Documents never attempted because an ordered write stopped early
    pub skipped: usize,
    /// Rejected documents, in batch order
    pub errors: Vec<WriteError>,
}

impl fmt::Display for WriteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rejected, {} inserted",
            self.errors.len(),
            self.inserted
        )?;
        if self.skipped > 0 {
            write!(f, ", {} not attempted", self.skipped)?;
        }
        if let Some(first) = self.errors.first() {
            write!(f, "; first error at {first}")?;
        }
        Ok(())
    }
}

/// A target collection that can start bulk operations.
///
/// Implementors are cheap handles; the connection behind them outlives any
/// buffer bound to the handle.
pub trait Collection: Send + Sync {
    /// Bulk operation type this collection starts.
    type Bulk: BulkOperation;

    /// Name used in error context and logs.
    fn namespace(&self) -> &str;

    /// Starts an empty, ordered bulk operation against this collection.
    fn bulk(&self) -> Self::Bulk;
}

/// A one-shot bulk insert builder.
#[async_trait]
pub trait BulkOperation: Send {
    /// Queues a document for insertion, after any already queued.
    fn insert(&mut self, doc: Document);

    /// Switches the operation to unordered mode.
    fn unordered(&mut self);

    /// Submits every queued document in one call.
    ///
    /// Returns `StoreError::Write` when the store applied some documents and
    /// rejected others; any other error means the batch failed as a whole.
    async fn run(self) -> Result<BulkWriteResult, StoreError>;
}
