//! Time windows and instants.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TopologyError};

/// An instant in milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Visible time range of a chart, `to` strictly after `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct TimeWindow {
    from: Timestamp,
    to: Timestamp,
}

impl TimeWindow {
    /// Create a window, rejecting empty or inverted spans.
    pub fn new(from: Timestamp, to: Timestamp) -> Result<Self> {
        if to <= from {
            return Err(TopologyError::InvalidWindow { from, to });
        }
        Ok(Self { from, to })
    }

    /// Create a window from two instants in either order.
    ///
    /// Returns `None` when both instants are equal.
    pub fn ordered(a: Timestamp, b: Timestamp) -> Option<Self> {
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        Self::new(from, to).ok()
    }

    /// Window start.
    pub fn from(&self) -> Timestamp {
        self.from
    }

    /// Window end.
    pub fn to(&self) -> Timestamp {
        self.to
    }

    /// Span of the window in milliseconds, saturating for extreme windows.
    pub fn span(&self) -> i64 {
        self.to.saturating_sub(self.from)
    }
}

#[derive(Deserialize)]
struct RawWindow {
    from: Timestamp,
    to: Timestamp,
}

impl TryFrom<RawWindow> for TimeWindow {
    type Error = TopologyError;

    fn try_from(raw: RawWindow) -> Result<Self> {
        Self::new(raw.from, raw.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_inverted_windows() {
        assert!(TimeWindow::new(10, 10).is_err());
        assert!(TimeWindow::new(10, 5).is_err());
        let window = TimeWindow::new(5, 10).unwrap();
        assert_eq!(window.span(), 5);
        assert_eq!(TimeWindow::new(i64::MIN, i64::MAX).unwrap().span(), i64::MAX);
    }

    #[test]
    fn ordered_swaps_bounds() {
        let window = TimeWindow::ordered(80, 20).unwrap();
        assert_eq!((window.from(), window.to()), (20, 80));
        assert!(TimeWindow::ordered(3, 3).is_none());
    }

    #[test]
    fn deserialize_validates_span() {
        let ok: TimeWindow = serde_json::from_str(r#"{"from": 0, "to": 100}"#).unwrap();
        assert_eq!(ok.to(), 100);
        let bad = serde_json::from_str::<TimeWindow>(r#"{"from": 100, "to": 0}"#);
        assert!(bad.is_err());
    }
}
