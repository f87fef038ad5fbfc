//! Mapping between instants and chart-local x coordinates.

use crate::view::{TimeWindow, Timestamp};

/// Linear transform from a time window onto a horizontal pixel span.
///
/// Coordinates are `f64` so that millisecond instants survive the round
/// trip through pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeTransform {
    window: TimeWindow,
    width: f64,
    span: f64,
}

impl TimeTransform {
    /// Create a transform for the given window and chart width.
    ///
    /// Returns `None` when the width is not a positive finite number, or
    /// when the window is too narrow to resolve at its magnitude.
    pub fn new(window: TimeWindow, width: f64) -> Option<Self> {
        let span = window.to() as f64 - window.from() as f64;
        if !width.is_finite() || width <= 0.0 || span <= 0.0 {
            return None;
        }
        Some(Self {
            window,
            width,
            span,
        })
    }

    /// Access the time window.
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Access the chart width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Map an instant to its chart-local x coordinate.
    pub fn time_to_x(&self, time: Timestamp) -> f64 {
        (time as f64 - self.window.from() as f64) / self.span * self.width
    }

    /// Map a chart-local x coordinate back to an instant, truncating and
    /// saturating at the `i64` range.
    pub fn x_to_time(&self, x: f64) -> Timestamp {
        (self.window.from() as f64 + (x / self.width * self.span).floor()) as Timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_roundtrip() {
        let window = TimeWindow::new(1_700_000_000_000, 1_700_086_400_000).unwrap();
        let transform = TimeTransform::new(window, 733.0).expect("valid transform");
        for step in 0..=97 {
            let time = window.from() + window.span() * step / 97;
            let roundtrip = transform.x_to_time(transform.time_to_x(time));
            assert!((roundtrip - time).abs() <= 1, "{time} -> {roundtrip}");
        }
    }

    #[test]
    fn edges_map_to_chart_bounds() {
        let window = TimeWindow::new(100, 200).unwrap();
        let transform = TimeTransform::new(window, 50.0).unwrap();
        assert_eq!(transform.time_to_x(100), 0.0);
        assert_eq!(transform.time_to_x(200), 50.0);
        assert_eq!(transform.x_to_time(25.0), 150);
    }

    #[test]
    fn extreme_instants_do_not_overflow() {
        let window = TimeWindow::new(1_700_000_000_000, 1_700_000_100_000).unwrap();
        let transform = TimeTransform::new(window, 100.0).unwrap();
        assert!(transform.time_to_x(i64::MIN) < -1e9);
        assert!(transform.time_to_x(i64::MAX) > 1e9);

        let widest = TimeWindow::new(i64::MIN, i64::MAX).unwrap();
        let transform = TimeTransform::new(widest, 100.0).unwrap();
        assert!((transform.time_to_x(0) - 50.0).abs() < 1e-6);
        assert_eq!(transform.x_to_time(1e6), i64::MAX);
    }

    #[test]
    fn rejects_non_positive_width() {
        let window = TimeWindow::new(0, 10).unwrap();
        assert!(TimeTransform::new(window, 0.0).is_none());
        assert!(TimeTransform::new(window, f64::NAN).is_none());
    }
}
