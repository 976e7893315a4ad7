//! Terminal output
//!
//! Consistent formatting for preflight results, build reports and doctor
//! output across the BarberGo tools.

use owo_colors::OwoColorize;

/// Glyph-prefixed status lines; errors and warnings go to stderr
pub struct Status;

impl Status {
    /// A completed step
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// A blocking failure
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// A non-blocking problem
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Neutral progress information
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a section header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.len()));
    }
}

/// Print a labelled value, aligned for scanning
pub fn key_value(label: &str, value: &str) {
    println!("  {:<16} {}", format!("{}:", label).dimmed(), value);
}

/// Human-readable duration (`480ms`, `3.2s`, `1m 42s`)
pub fn format_duration(duration: std::time::Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Human-readable artifact size (`420 B`, `28.4 MB`)
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Pick the singular or plural noun for a count
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration(Duration::from_millis(480)), "480ms");
    }

    #[test]
    fn test_format_duration_secs() {
        assert_eq!(format_duration(Duration::from_millis(3200)), "3.2s");
    }

    #[test]
    fn test_format_duration_mins() {
        assert_eq!(format_duration(Duration::from_secs(102)), "1m 42s");
    }

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(420), "420 B");
    }

    #[test]
    fn test_format_size_apk() {
        assert_eq!(format_size(29_760_307), "28.4 MB");
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "warning", "warnings"), "1 warning");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(3, "warning", "warnings"), "3 warnings");
    }
}
