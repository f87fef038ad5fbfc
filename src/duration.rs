//! Human-readable durations.

use chrono::TimeDelta;

use crate::view::Timestamp;

/// Format the elapsed time between two instants as `1h 2m 3s`.
///
/// Components are truncated, the hour part is omitted when zero, and an
/// end before the start reads as zero.
pub fn format_duration(start: Timestamp, end: Timestamp) -> String {
    let elapsed = TimeDelta::milliseconds(end.saturating_sub(start).max(0));
    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes() % 60;
    let seconds = elapsed.num_seconds() % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else {
        format!("{minutes}m {seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: i64 = 1_000;

    #[test]
    fn hours_hidden_when_zero() {
        assert_eq!(format_duration(0, 5 * SECOND), "0m 5s");
        assert_eq!(format_duration(0, 45 * SECOND), "0m 45s");
    }

    #[test]
    fn full_breakdown() {
        assert_eq!(format_duration(0, 3_723 * SECOND), "1h 2m 3s");
        assert_eq!(format_duration(10, 10 + 26 * 3_600 * SECOND), "26h 0m 0s");
    }

    #[test]
    fn truncates_partial_seconds() {
        assert_eq!(format_duration(0, 59_999), "0m 59s");
        assert_eq!(format_duration(500, 100), "0m 0s");
    }
}
