use crate::axis::format_local;
use crate::duration::format_duration;
use crate::geom::{ScreenPoint, ScreenRect, clamp_point};
use crate::style::Theme;
use crate::topology::Event;

use super::{
    LineSegment, LineStyle, RectStyle, RenderCommand, RenderList, TextMeasurer, TextStyle,
};

/// Tooltip box size in pixels.
pub const TOOLTIP_SIZE: (f32, f32) = (300.0, 100.0);

const CURSOR_GAP: f32 = 20.0;
const PADDING: f32 = 5.0;

/// Hover details for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Heading, the event start date and time.
    pub title: String,
    /// Label/value rows.
    pub rows: Vec<(String, String)>,
}

impl Tooltip {
    /// Tooltip for an event, with dates in the local time zone.
    pub fn for_event(event: &Event) -> Self {
        Self {
            title: format_local(event.time, "%Y-%m-%d %H:%M:%S"),
            rows: vec![(
                "Duration".to_string(),
                format_duration(event.time, event.time_end),
            )],
        }
    }
}

/// Draw a tooltip next to the cursor, kept inside `bounds`.
pub fn build_tooltip(
    render: &mut RenderList,
    tooltip: &Tooltip,
    cursor: ScreenPoint,
    bounds: ScreenRect,
    theme: &Theme,
    measurer: &dyn TextMeasurer,
) {
    let origin = clamp_point(
        ScreenPoint::new(cursor.x + CURSOR_GAP, cursor.y + CURSOR_GAP),
        bounds,
        TOOLTIP_SIZE,
    );
    let rect = ScreenRect::from_origin_size(origin.x, origin.y, TOOLTIP_SIZE.0, TOOLTIP_SIZE.1);
    render.push(RenderCommand::Rect {
        rect,
        style: RectStyle {
            fill: theme.tooltip_bg,
            stroke: theme.border,
            stroke_width: 1.0,
        },
    });

    let size = theme.font_size;
    let row_height = size * 1.4;
    render.push(RenderCommand::Text {
        position: ScreenPoint::new(rect.min.x + PADDING, rect.min.y + PADDING),
        text: tooltip.title.clone(),
        style: TextStyle {
            color: theme.text,
            size,
        },
    });
    let divider_y = rect.min.y + PADDING * 2.0 + row_height;
    render.push(RenderCommand::LineSegments {
        segments: vec![LineSegment::new(
            ScreenPoint::new(rect.min.x, divider_y),
            ScreenPoint::new(rect.max.x, divider_y),
        )],
        style: LineStyle {
            color: theme.border,
            width: 1.0,
        },
    });

    for (index, (label, value)) in tooltip.rows.iter().enumerate() {
        let y = divider_y + PADDING + index as f32 * row_height;
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(rect.min.x + PADDING, y),
            text: label.clone(),
            style: TextStyle {
                color: theme.text,
                size,
            },
        });
        let value_x = rect.max.x - PADDING - measurer.measure(value, size).0;
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(value_x, y),
            text: value.clone(),
            style: TextStyle {
                color: theme.text,
                size,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    struct FixedMeasurer;

    impl TextMeasurer for FixedMeasurer {
        fn measure(&self, text: &str, size: f32) -> (f32, f32) {
            (text.chars().count() as f32 * 10.0, size)
        }
    }

    fn event() -> Event {
        Event {
            time: 0,
            time_end: 3_723_000,
            label: "up".to_string(),
            color: Color::WHITE,
        }
    }

    #[test]
    fn reports_event_duration() {
        let tooltip = Tooltip::for_event(&event());
        assert_eq!(tooltip.rows, [("Duration".to_string(), "1h 2m 3s".to_string())]);
    }

    #[test]
    fn stays_inside_bounds() {
        let mut render = RenderList::new();
        let bounds = ScreenRect::from_origin_size(0.0, 0.0, 400.0, 200.0);
        let tooltip = Tooltip::for_event(&event());
        build_tooltip(
            &mut render,
            &tooltip,
            ScreenPoint::new(390.0, 190.0),
            bounds,
            &Theme::dark(),
            &FixedMeasurer,
        );
        let RenderCommand::Rect { rect, .. } = &render.commands()[0] else {
            panic!("expected the tooltip box first");
        };
        assert_eq!(*rect, ScreenRect::from_origin_size(100.0, 100.0, 300.0, 100.0));
    }

    #[test]
    fn duration_right_aligned_by_measured_width() {
        let mut render = RenderList::new();
        let bounds = ScreenRect::from_origin_size(0.0, 0.0, 800.0, 600.0);
        build_tooltip(
            &mut render,
            &Tooltip::for_event(&event()),
            ScreenPoint::new(0.0, 0.0),
            bounds,
            &Theme::dark(),
            &FixedMeasurer,
        );
        let value = render.commands().iter().find_map(|command| match command {
            RenderCommand::Text { position, text, .. } if text == "1h 2m 3s" => Some(*position),
            _ => None,
        });
        // Box spans x 20..320; "1h 2m 3s" measures 80 plus 5 padding.
        assert_eq!(value.unwrap().x, 235.0);
    }
}
