//! Chart geometry: graduations, line bands and event rectangles.
//!
//! [`recompute_layout`] is a pure function of the normalized lines and the
//! render inputs. Callers run it again whenever any input changes; nothing is
//! cached between frames.

use crate::axis::{Tick, time_ticks};
use crate::geom::{Band, ScreenPoint, ScreenRect};
use crate::topology::Line;
use crate::transform::TimeTransform;
use crate::view::TimeWindow;

/// Share of the panel height given to the gap before each line.
pub const DEFAULT_MARGIN_RATIO: f64 = 0.05;

/// Render inputs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutInputs {
    /// Chart width in pixels.
    pub width: f64,
    /// Chart height in pixels.
    pub height: f64,
    /// Visible time window.
    pub window: TimeWindow,
    /// Gap between lines in pixels.
    pub margin: f64,
}

/// Pixel rectangle of one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventGeometry {
    /// Index of the owning line.
    pub line: usize,
    /// Index of the event within its line.
    pub index: usize,
    /// Chart-local rectangle; width is never negative.
    pub rect: ScreenRect,
}

/// Geometry of a whole chart frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartLayout {
    transform: Option<TimeTransform>,
    /// Graduations, left to right.
    pub ticks: Vec<Tick>,
    /// One band per line, top to bottom.
    pub bands: Vec<Band>,
    /// Event rectangles in line order, then event order.
    pub events: Vec<EventGeometry>,
}

impl ChartLayout {
    /// A layout that draws nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check whether the layout draws nothing.
    pub fn is_empty(&self) -> bool {
        self.transform.is_none()
    }

    /// Time mapping used for this frame, if the inputs were valid.
    pub fn transform(&self) -> Option<&TimeTransform> {
        self.transform.as_ref()
    }

    /// Topmost event under a chart-local point.
    pub fn hit_test(&self, point: ScreenPoint) -> Option<&EventGeometry> {
        self.events
            .iter()
            .rev()
            .find(|event| event.rect.contains(point))
    }
}

/// Compute the geometry of a chart frame.
///
/// Degenerate inputs (no lines, non-positive size, or bands that would have
/// no height) give an empty layout.
pub fn recompute_layout(lines: &[Line], inputs: &LayoutInputs) -> ChartLayout {
    if lines.is_empty() || !inputs.height.is_finite() || inputs.height <= 0.0 {
        return ChartLayout::empty();
    }
    let Some(transform) = TimeTransform::new(inputs.window, inputs.width) else {
        return ChartLayout::empty();
    };

    let count = lines.len() as f64;
    let margin = inputs.margin.max(0.0);
    let line_height = (inputs.height - count * margin) / count;
    if !line_height.is_finite() || line_height <= 0.0 {
        tracing::debug!(lines = lines.len(), inputs.height, margin, "no room for lines");
        return ChartLayout::empty();
    }
    tracing::debug!(lines = lines.len(), line_height, "chart layout");

    let bands: Vec<Band> = (0..lines.len())
        .map(|index| Band {
            top: (index as f64 * (line_height + margin)) as f32,
            height: line_height as f32,
        })
        .collect();

    let events = lines
        .iter()
        .zip(&bands)
        .enumerate()
        .flat_map(|(line, (source, band))| {
            source.events.iter().enumerate().map(move |(index, event)| {
                let x = transform.time_to_x(event.time);
                let width = (transform.time_to_x(event.time_end) - x).max(0.0);
                EventGeometry {
                    line,
                    index,
                    rect: ScreenRect::from_origin_size(
                        x as f32,
                        band.top,
                        width as f32,
                        band.height,
                    ),
                }
            })
        })
        .collect();

    ChartLayout {
        transform: Some(transform),
        ticks: time_ticks(&transform),
        bands,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::topology::Event;

    fn line(spans: &[(i64, i64)]) -> Line {
        Line {
            path: vec!["p".to_string()],
            events: spans
                .iter()
                .map(|&(time, time_end)| Event {
                    time,
                    time_end,
                    label: String::new(),
                    color: Color::BLACK,
                })
                .collect(),
        }
    }

    fn inputs(width: f64, height: f64, margin: f64) -> LayoutInputs {
        LayoutInputs {
            width,
            height,
            window: TimeWindow::new(0, 1_000).unwrap(),
            margin,
        }
    }

    #[test]
    fn bands_stack_with_margin() {
        let lines = vec![line(&[]), line(&[]), line(&[])];
        let layout = recompute_layout(&lines, &inputs(700.0, 330.0, 10.0));
        let tops: Vec<_> = layout.bands.iter().map(|band| band.top).collect();
        assert_eq!(tops, [0.0, 110.0, 220.0]);
        assert!(layout.bands.iter().all(|band| band.height == 100.0));
        assert_eq!(layout.ticks.len(), 4);
    }

    #[test]
    fn event_rects_follow_time_mapping() {
        let lines = vec![line(&[(100, 300)]), line(&[(500, 10_000)])];
        let layout = recompute_layout(&lines, &inputs(1_000.0, 220.0, 10.0));
        let first = layout.events[0];
        assert_eq!((first.line, first.index), (0, 0));
        assert_eq!(first.rect.min.x, 100.0);
        assert_eq!(first.rect.width(), 200.0);
        assert_eq!(first.rect.height(), 100.0);
        let second = layout.events[1];
        assert_eq!(second.line, 1);
        assert_eq!(second.rect.min.y, 110.0);
        assert_eq!(second.rect.max.x, 10_000.0);
    }

    #[test]
    fn inverted_event_is_zero_width() {
        let lines = vec![line(&[(600, 400)])];
        let layout = recompute_layout(&lines, &inputs(1_000.0, 100.0, 0.0));
        assert_eq!(layout.events[0].rect.width(), 0.0);
    }

    #[test]
    fn degenerate_inputs_give_empty_layout() {
        assert!(recompute_layout(&[], &inputs(700.0, 300.0, 10.0)).is_empty());
        let lines = vec![line(&[(0, 10)])];
        assert!(recompute_layout(&lines, &inputs(0.0, 300.0, 10.0)).is_empty());
        assert!(recompute_layout(&lines, &inputs(700.0, 0.0, 10.0)).is_empty());
        assert!(recompute_layout(&lines, &inputs(700.0, 10.0, 10.0)).is_empty());
    }

    #[test]
    fn hit_test_finds_event_under_point() {
        let lines = vec![line(&[(0, 400), (400, 800)]), line(&[(0, 1_000)])];
        let layout = recompute_layout(&lines, &inputs(1_000.0, 200.0, 0.0));
        let hit = layout.hit_test(ScreenPoint::new(500.0, 50.0)).unwrap();
        assert_eq!((hit.line, hit.index), (0, 1));
        let hit = layout.hit_test(ScreenPoint::new(900.0, 150.0)).unwrap();
        assert_eq!((hit.line, hit.index), (1, 0));
        assert!(layout.hit_test(ScreenPoint::new(900.0, 50.0)).is_none());
    }
}
