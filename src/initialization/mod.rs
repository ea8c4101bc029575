//! Application initialization.
//!
//! Sets up process-wide resources for the loader binary. Database pools are
//! created by [`crate::store::init_db_pool_with_path`] and passed explicitly.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
