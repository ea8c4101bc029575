//! Shared test helpers for store and buffer tests.
//!
//! Provides in-memory SQLite collections and a recording collection double
//! that counts bulk runs without touching a database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::document::Document;
use crate::error_handling::StoreError;
use crate::store::{BulkOperation, BulkWriteResult, Collection, SqliteCollection, WriteMode};

/// Creates an in-memory database pool.
/// A single connection keeps every query on the same in-memory database.
pub async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool")
}

/// Creates an in-memory collection with its table in place.
pub async fn create_test_collection(name: &str) -> SqliteCollection {
    SqliteCollection::create(create_test_pool().await, name)
        .await
        .expect("Failed to create test collection")
}

/// One bulk run as seen by a [`RecordingCollection`].
#[derive(Debug, Clone)]
pub struct RecordedBatch {
    pub mode: WriteMode,
    pub docs: Vec<Document>,
}

/// Collection double that records every bulk run.
///
/// Runs succeed unless `fail_with_transport` is set, in which case every run
/// reports a closed pool.
#[derive(Debug, Clone, Default)]
pub struct RecordingCollection {
    batches: Arc<Mutex<Vec<RecordedBatch>>>,
    fail: Arc<Mutex<bool>>,
}

impl RecordingCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> Vec<RecordedBatch> {
        self.batches.lock().expect("lock").clone()
    }

    pub fn run_count(&self) -> usize {
        self.batches.lock().expect("lock").len()
    }

    pub fn fail_with_transport(&self, fail: bool) {
        *self.fail.lock().expect("lock") = fail;
    }
}

pub struct RecordingBulk {
    batches: Arc<Mutex<Vec<RecordedBatch>>>,
    fail: bool,
    mode: WriteMode,
    docs: Vec<Document>,
}

impl Collection for RecordingCollection {
    type Bulk = RecordingBulk;

    fn namespace(&self) -> &str {
        "recording"
    }

    fn bulk(&self) -> RecordingBulk {
        RecordingBulk {
            batches: Arc::clone(&self.batches),
            fail: *self.fail.lock().expect("lock"),
            mode: WriteMode::Ordered,
            docs: Vec::new(),
        }
    }
}

#[async_trait]
impl BulkOperation for RecordingBulk {
    fn insert(&mut self, doc: Document) {
        self.docs.push(doc);
    }

    fn unordered(&mut self) {
        self.mode = WriteMode::Unordered;
    }

    async fn run(self) -> Result<BulkWriteResult, StoreError> {
        let inserted = self.docs.len() as u64;
        self.batches.lock().expect("lock").push(RecordedBatch {
            mode: self.mode,
            docs: self.docs,
        });
        if self.fail {
            return Err(StoreError::Transport(sqlx::Error::PoolClosed));
        }
        Ok(BulkWriteResult { inserted })
    }
}
