//! Time axis graduations and label formatting.

use std::sync::Arc;

use chrono::{Local, TimeZone};

use crate::transform::TimeTransform;
use crate::view::Timestamp;

/// Minimum horizontal spacing between graduations, in pixels.
pub const MIN_TICK_SPACING: f64 = 175.0;

/// A graduation on the time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Instant of the graduation.
    pub time: Timestamp,
    /// Chart-local x coordinate.
    pub x: f64,
}

/// Number of graduations shown for a chart width.
pub fn tick_count(width: f64) -> usize {
    if !width.is_finite() || width <= 0.0 {
        return 0;
    }
    (width / MIN_TICK_SPACING).ceil() as usize
}

/// Evenly spaced graduations strictly inside the window.
///
/// The window is cut into `tick_count + 1` equal parts and the left edge is
/// dropped, so the last graduation sits one part before the right edge.
pub fn time_ticks(transform: &TimeTransform) -> Vec<Tick> {
    let count = tick_count(transform.width());
    let window = transform.window();
    let parts = count as i128 + 1;
    let span = window.to() as i128 - window.from() as i128;
    (1..=count as i128)
        .map(|index| {
            // Stays within the window, so the narrowing cast is exact.
            let time = (window.from() as i128 + index * span / parts) as Timestamp;
            Tick {
                time,
                x: transform.time_to_x(time),
            }
        })
        .collect()
}

/// Formatter for graduation and tooltip labels.
#[derive(Clone, Default)]
pub enum TickFormatter {
    /// Local wall-clock time, `HH:MM:SS`.
    #[default]
    LocalTime,
    /// Custom formatter callback.
    Custom(Arc<dyn Fn(Timestamp) -> String + Send + Sync>),
}

impl TickFormatter {
    /// Create a custom formatter.
    pub fn custom(formatter: impl Fn(Timestamp) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(formatter))
    }

    /// Format an instant for display.
    pub fn format(&self, time: Timestamp) -> String {
        match self {
            Self::LocalTime => format_local(time, "%H:%M:%S"),
            Self::Custom(formatter) => formatter(time),
        }
    }
}

impl std::fmt::Debug for TickFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalTime => write!(f, "TickFormatter::LocalTime"),
            Self::Custom(_) => write!(f, "TickFormatter::Custom(..)"),
        }
    }
}

/// Format an instant in the local time zone with a `strftime` pattern.
pub fn format_local(time: Timestamp, pattern: &str) -> String {
    match Local.timestamp_millis_opt(time).single() {
        Some(date) => date.format(pattern).to_string(),
        None => time.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::TimeWindow;

    #[test]
    fn one_tick_per_started_spacing() {
        assert_eq!(tick_count(700.0), 4);
        assert_eq!(tick_count(701.0), 5);
        assert_eq!(tick_count(1.0), 1);
        assert_eq!(tick_count(0.0), 0);
    }

    #[test]
    fn ticks_skip_left_edge() {
        let window = TimeWindow::new(0, 1_000).unwrap();
        let transform = TimeTransform::new(window, 700.0).unwrap();
        let ticks = time_ticks(&transform);
        let times: Vec<_> = ticks.iter().map(|tick| tick.time).collect();
        assert_eq!(times, [200, 400, 600, 800]);
        assert!(ticks.iter().all(|tick| tick.x > 0.0 && tick.x < 700.0));
        assert!((ticks[0].x - 140.0).abs() < 1e-9);
    }

    #[test]
    fn ticks_for_widest_window() {
        let window = TimeWindow::new(i64::MIN, i64::MAX).unwrap();
        let transform = TimeTransform::new(window, 350.0).unwrap();
        let ticks = time_ticks(&transform);
        assert_eq!(ticks.len(), 2);
        assert!(ticks[0].time < ticks[1].time);
    }

    #[test]
    fn custom_formatter() {
        let formatter = TickFormatter::custom(|time| format!("t={time}"));
        assert_eq!(formatter.format(5), "t=5");
    }
}
