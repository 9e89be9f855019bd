//! Banner printed when a workflow finishes.

use chrono::{DateTime, Local};
use colored::Colorize;

/// Format the closing banner of a run.
///
/// # Arguments
/// * `success` - picks the ✅/❌ marker and color
/// * `message` - the one line summary
/// * `started` - run start, used for the elapsed time
pub fn banner(success: bool, message: &str, started: DateTime<Local>) -> String {
    let elapsed = Local::now().signed_duration_since(started);
    let line = format!(
        "{mark} {message} ({secs}s, started {start})",
        mark = if success { "✅" } else { "❌" },
        secs = elapsed.num_seconds(),
        start = started.format("%Y-%m-%d %H:%M:%S"),
    );
    if success {
        line.green().bold().to_string()
    } else {
        line.red().bold().to_string()
    }
}

pub fn print_banner(success: bool, message: &str, started: DateTime<Local>) {
    println!("\n{}", banner(success, message, started));
}
