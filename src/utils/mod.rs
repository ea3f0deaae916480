// Mon Oct 19 2026 - Alex

pub mod logging;

pub use logging::{init_logger, scoped_timer, ScopedTimer};

use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();

    if secs < 0.001 {
        format!("{}µs", duration.as_micros())
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else {
        format!("{:.2}s", secs)
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
