//! Loader support modules.
//!
//! This module provides input handling and progress logging used by the
//! import run.

pub mod input;
pub mod logging;

// Re-export public API
pub use input::open_input;
pub use logging::log_progress;
