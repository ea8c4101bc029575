//! SQLite-backed document collections.
//!
//! Each collection is a table holding one row per document:
//! - `seq`: insertion sequence (autoincrement primary key)
//! - `doc_id`: string form of the document's `_id`, unique when present
//! - `body`: the encoded JSON object

mod bulk;

use sqlx::{Row, SqlitePool};

use crate::document::Document;
use crate::error_handling::StoreError;

use super::Collection;

pub use bulk::SqliteBulk;

/// Handle on a collection table in a SQLite database.
///
/// Cloning is cheap: clones share the caller's pool. The handle never closes
/// the pool.
#[derive(Debug, Clone)]
pub struct SqliteCollection {
    pool: SqlitePool,
    name: String,
}

impl SqliteCollection {
    /// Opens the collection `name`, creating its table if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidCollectionName` for names that are empty,
    /// contain anything other than ASCII letters, digits and `_`, or start
    /// with SQLite's reserved `sqlite_` prefix.
    pub async fn create(pool: SqlitePool, name: &str) -> Result<Self, StoreError> {
        validate_collection_name(name)?;

        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS \"{name}\" (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                doc_id TEXT UNIQUE,
                body TEXT NOT NULL
            )"
        ))
        .execute(&pool)
        .await?;

        log::debug!("Collection {} ready", name);

        Ok(SqliteCollection {
            pool,
            name: name.to_string(),
        })
    }

    /// Collection (table) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pool the collection writes through.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of documents stored.
    pub async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{}\"", self.name))
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Looks up a document by the string form of its `_id`.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT doc_id, body FROM \"{}\" WHERE doc_id = ?",
            self.name
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Document::from_stored(row.get("body"), row.get("doc_id"))))
    }

    /// Every stored document, in the order the store applied them.
    pub async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT doc_id, body FROM \"{}\" ORDER BY seq",
            self.name
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Document::from_stored(row.get("body"), row.get("doc_id")))
            .collect())
    }

    /// Drops the collection table. The handle can be reopened with [`Self::create`].
    pub async fn drop_collection(&self) -> Result<(), StoreError> {
        sqlx::query(&format!("DROP TABLE IF EXISTS \"{}\"", self.name))
            .execute(&self.pool)
            .await?;
        log::info!("Dropped collection {}", self.name);
        Ok(())
    }
}

impl Collection for SqliteCollection {
    type Bulk = SqliteBulk;

    fn namespace(&self) -> &str {
        &self.name
    }

    fn bulk(&self) -> SqliteBulk {
        SqliteBulk::new(self.pool.clone(), self.name.clone())
    }
}

/// Checks that a collection name is safe to use as a quoted table name.
pub(crate) fn validate_collection_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.to_ascii_lowercase().starts_with("sqlite_");
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidCollectionName(name.to_string()))
    }
}
