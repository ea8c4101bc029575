//! Error handling.
//!
//! Error types are split by where they surface:
//! - **Admission**: a record cannot be encoded or is too large (`DocumentError`)
//! - **Store**: the store was unreachable or rejected documents (`StoreError`)
//! - **Buffer**: what `insert`/`flush` return, carrying collection and batch context (`BufferError`)

mod types;

// Re-export public API
pub use types::{BufferError, DocumentError, InitializationError, StoreError};
