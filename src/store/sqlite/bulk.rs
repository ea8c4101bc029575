//! Bulk insert operation for SQLite collections.

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::SqlitePool;

use crate::document::Document;
use crate::error_handling::StoreError;
use crate::store::{BulkOperation, BulkWriteResult, WriteError, WriteFailure, WriteMode};

/// Bulk insert builder for a [`super::SqliteCollection`].
///
/// All documents are written inside one transaction, one INSERT each. A
/// constraint violation only rolls back its own statement, so the documents
/// the store accepted are committed even when others were rejected, the same
/// as a non-transactional bulk write. Any other error abandons the transaction
/// and fails the whole batch.
pub struct SqliteBulk {
    pool: SqlitePool,
    table: String,
    mode: WriteMode,
    docs: Vec<Document>,
}

impl SqliteBulk {
    pub(super) fn new(pool: SqlitePool, table: String) -> Self {
        SqliteBulk {
            pool,
            table,
            mode: WriteMode::Ordered,
            docs: Vec::new(),
        }
    }

    /// Ordering the operation will run with.
    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Number of queued documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether no document has been queued.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[async_trait]
impl BulkOperation for SqliteBulk {
    fn insert(&mut self, doc: Document) {
        self.docs.push(doc);
    }

    fn unordered(&mut self) {
        self.mode = WriteMode::Unordered;
    }

    async fn run(self) -> Result<BulkWriteResult, StoreError> {
        let total = self.docs.len();
        let sql = format!(
            "INSERT INTO \"{}\" (doc_id, body) VALUES (?, ?)",
            self.table
        );

        let mut tx = self.pool.begin().await?;
        let mut inserted: u64 = 0;
        let mut errors = Vec::new();
        let mut skipped = 0;

        for (index, doc) in self.docs.iter().enumerate() {
            let outcome = sqlx::query(&sql)
                .bind(doc.id())
                .bind(doc.as_str())
                .execute(&mut *tx)
                .await;

            match outcome {
                Ok(_) => inserted += 1,
                Err(sqlx::Error::Database(db_err)) if is_document_rejection(db_err.kind()) => {
                    log::trace!(
                        "Document {} of {} rejected by {}: {}",
                        index,
                        total,
                        self.table,
                        db_err
                    );
                    errors.push(WriteError {
                        index,
                        id: doc.id().map(str::to_string),
                        code: db_err.code().map(|c| c.into_owned()),
                        message: db_err.message().to_string(),
                    });
                    if self.mode.is_ordered() {
                        skipped = total - index - 1;
                        break;
                    }
                }
                // Dropping the transaction rolls back everything from this batch.
                Err(e) => return Err(StoreError::Transport(e)),
            }
        }

        tx.commit().await?;

        if errors.is_empty() {
            Ok(BulkWriteResult { inserted })
        } else {
            Err(StoreError::Write(WriteFailure {
                inserted,
                skipped,
                errors,
            }))
        }
    }
}

/// Errors caused by the document itself rather than by the connection.
fn is_document_rejection(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation
    )
}
