//! Formatting helpers for durations and memory figures

use humansize::{format_size, BINARY};

/// Human-readable duration from fractional seconds
pub fn format_duration(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{:.2} ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.3} s", seconds)
    } else if seconds < 3600.0 {
        let minutes = (seconds / 60.0).floor() as u64;
        format!("{}m {:.1}s", minutes, seconds % 60.0)
    } else {
        let hours = (seconds / 3600.0).floor() as u64;
        let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
        format!("{}h {}m {:.1}s", hours, minutes, seconds % 60.0)
    }
}

/// Human-readable size for a value in MB. Deltas may be negative.
pub fn format_memory_mb(mb: f64) -> String {
    let bytes = (mb.abs() * 1024.0 * 1024.0).round() as u64;
    let formatted = format_size(bytes, BINARY);
    if mb < 0.0 && bytes > 0 {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

pub fn safe_divide(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator == 0.0 {
        default
    } else {
        numerator / denominator
    }
}
