//! Rendering primitives and chart command builders.
//!
//! These types are backend-agnostic and are used by render backends (such as the
//! GPUI backend) to describe how charts should be drawn.

mod tooltip;

pub use tooltip::{TOOLTIP_SIZE, Tooltip, build_tooltip};

use crate::axis::TickFormatter;
use crate::color::Color;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::interaction::DragSelection;
use crate::layout::ChartLayout;
use crate::style::Theme;
use crate::topology::Line;

/// Measures text extents for layout.
pub trait TextMeasurer {
    /// Width and height of `text` at `size` pixels.
    fn measure(&self, text: &str, size: f32) -> (f32, f32);
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

/// Rectangle styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width.
    pub stroke_width: f32,
}

/// Text styling.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
}

/// A line segment in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Segment start.
    pub start: ScreenPoint,
    /// Segment end.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Create a new line segment.
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }
}

/// Render command list.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Start clipping to a rectangle.
    ClipRect(ScreenRect),
    /// End clipping.
    ClipEnd,
    /// Draw line segments.
    LineSegments {
        /// Segments to draw.
        segments: Vec<LineSegment>,
        /// Styling for the segments.
        style: LineStyle,
    },
    /// Draw a rectangle.
    Rect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Rectangle styling.
        style: RectStyle,
    },
    /// Draw text with its top-left corner at `position`.
    Text {
        /// Text position.
        position: ScreenPoint,
        /// Text content.
        text: String,
        /// Text styling.
        style: TextStyle,
    },
}

/// Aggregated render commands.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Vertical graduation lines with their time labels.
pub fn build_graduations(
    render: &mut RenderList,
    layout: &ChartLayout,
    chart: ScreenRect,
    theme: &Theme,
    formatter: &TickFormatter,
) {
    if layout.ticks.is_empty() {
        return;
    }
    let segments = layout
        .ticks
        .iter()
        .map(|tick| {
            let x = chart.min.x + tick.x as f32;
            LineSegment::new(ScreenPoint::new(x, chart.min.y), ScreenPoint::new(x, chart.max.y))
        })
        .collect();
    render.push(RenderCommand::LineSegments {
        segments,
        style: LineStyle {
            color: theme.border,
            width: 1.0,
        },
    });

    let size = theme.font_size * 0.9;
    for tick in &layout.ticks {
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(
                chart.min.x + tick.x as f32 + 5.0,
                chart.max.y - 2.0 - size * 1.2,
            ),
            text: formatter.format(tick.time),
            style: TextStyle {
                color: theme.tick_text,
                size,
            },
        });
    }
}

/// One translucent, outlined rectangle per event, clipped to the chart.
pub fn build_events(
    render: &mut RenderList,
    lines: &[Line],
    layout: &ChartLayout,
    chart: ScreenRect,
    theme: &Theme,
) {
    if layout.events.is_empty() {
        return;
    }
    render.push(RenderCommand::ClipRect(chart));
    for geometry in &layout.events {
        let Some(event) = lines
            .get(geometry.line)
            .and_then(|line| line.events.get(geometry.index))
        else {
            continue;
        };
        render.push(RenderCommand::Rect {
            rect: geometry.rect.translate(chart.min.x, chart.min.y),
            style: RectStyle {
                fill: event.color.with_alpha(event.color.a * theme.event_fill_alpha),
                stroke: event.color,
                stroke_width: 1.0,
            },
        });
    }
    render.push(RenderCommand::ClipEnd);
}

/// Live drag selection spanning the chart height.
pub fn build_selection(
    render: &mut RenderList,
    selection: &DragSelection,
    chart: ScreenRect,
    theme: &Theme,
) {
    let Some(rect) = selection.rect(chart.height()) else {
        return;
    };
    render.push(RenderCommand::ClipRect(chart));
    render.push(RenderCommand::Rect {
        rect: rect.translate(chart.min.x, chart.min.y),
        style: RectStyle {
            fill: theme.selection_fill,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
        },
    });
    render.push(RenderCommand::ClipEnd);
}
