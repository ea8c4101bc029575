//! Progress logging utilities.

use log::info;

/// Logs progress information about an import.
///
/// # Arguments
///
/// * `start_time` - The start time of the import
/// * `lines_read` - Number of input lines consumed so far
/// * `inserted` - Number of documents the store has accepted so far
pub fn log_progress(start_time: std::time::Instant, lines_read: usize, inserted: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    info!(
        "Read {} lines, inserted {} documents in {:.2} seconds (~{:.2} lines/sec)",
        lines_read,
        inserted,
        elapsed_secs,
        rate(lines_read, elapsed_secs)
    );
}

fn rate(count: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        count as f64 / elapsed_secs
    } else {
        0.0
    }
}
