//! Input source handling.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// Line reader over a file or stdin.
pub type InputLines = Lines<Box<dyn AsyncBufRead + Unpin + Send>>;

/// Opens `path` for line-by-line reading, or stdin when `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub async fn open_input(path: Option<&Path>) -> Result<InputLines> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match path {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            log::info!("Reading documents from {}", path.display());
            Box::new(BufReader::new(file))
        }
        None => {
            log::info!("Reading documents from stdin");
            Box::new(BufReader::new(tokio::io::stdin()))
        }
    };
    Ok(reader.lines())
}
