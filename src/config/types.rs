//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DB_ACQUIRE_TIMEOUT_SECS, DEFAULT_BATCH_SIZE, DEFAULT_COLLECTION, DEFAULT_DB_PATH,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Loader configuration.
///
/// Usable both as parsed command-line options and as a plain struct built
/// programmatically.
///
/// # Examples
///
/// ```no_run
/// use bulk_write_buffer::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: Some(PathBuf::from("people.jsonl")),
///     collection: "people".to_string(),
///     batch_size: 500,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bulk_write_buffer",
    version,
    about = "Load JSON-lines documents into a SQLite collection using buffered bulk writes"
)]
pub struct Config {
    /// JSON-lines file to read documents from (`-` or omitted reads stdin)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Database path (SQLite file, created if missing)
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Target collection (table) name
    #[arg(long, short = 'c', default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Documents buffered per bulk write; zero or negative disables the count limit
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, allow_negative_numbers = true)]
    pub batch_size: i64,

    /// Use unordered bulk writes (keep inserting past rejected documents)
    #[arg(long)]
    pub unordered: bool,

    /// Abort the load on the first failed batch or unreadable line
    #[arg(long)]
    pub stop_on_error: bool,

    /// Drop the collection before loading
    #[arg(long)]
    pub drop: bool,

    /// Seconds to wait for a database connection
    #[arg(long, default_value_t = DB_ACQUIRE_TIMEOUT_SECS)]
    pub timeout_seconds: u64,
}

impl Config {
    /// Returns the input file, or `None` when documents come from stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.file
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            collection: DEFAULT_COLLECTION.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            unordered: false,
            stop_on_error: false,
            drop: false,
            timeout_seconds: DB_ACQUIRE_TIMEOUT_SECS,
        }
    }
}
