//! Common utilities and helpers

use std::time::Duration;

pub mod logging;
pub mod path;

/// Format elapsed time for the run summary
pub fn format_elapsed(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let minutes = total_seconds / 60;
    let seconds = duration.as_secs_f64() - (minutes * 60) as f64;

    if minutes > 0 {
        format!("{}m {:.2}s", minutes, seconds)
    } else {
        format!("{:.2}s", seconds)
    }
}
