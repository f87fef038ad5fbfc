use gpui::{
    App, BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, Window, point, px,
    quad,
};

use crate::color::Color;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{LineSegment, LineStyle, RectStyle, RenderCommand, TextStyle};

use super::frame::TopologyFrame;
use super::text::{line_height, shape};

/// Replay a frame's commands onto the window.
///
/// Clip rectangles nest; each draw uses the innermost one.
pub(crate) fn paint_frame(frame: &TopologyFrame, window: &mut Window, cx: &mut App) {
    let mut clips: Vec<ContentMask<Pixels>> = Vec::new();
    for command in frame.render.commands() {
        let mask = clips.last().cloned();
        match command {
            RenderCommand::ClipRect(rect) => clips.push(ContentMask {
                bounds: to_bounds(*rect),
            }),
            RenderCommand::ClipEnd => {
                clips.pop();
            }
            RenderCommand::LineSegments { segments, style } => {
                window.with_content_mask(mask, |window| stroke_segments(window, segments, *style));
            }
            RenderCommand::Rect { rect, style } => {
                window.with_content_mask(mask, |window| fill_rect(window, *rect, *style));
            }
            RenderCommand::Text {
                position,
                text,
                style,
            } => {
                window.with_content_mask(mask, |window| {
                    draw_text(window, cx, *position, text, style)
                });
            }
        }
    }
}

fn stroke_segments(window: &mut Window, segments: &[LineSegment], style: LineStyle) {
    if segments.is_empty() || style.color.a <= 0.0 {
        return;
    }
    let mut builder = PathBuilder::stroke(px(style.width.max(0.5)));
    for segment in segments {
        builder.move_to(to_point(segment.start));
        builder.line_to(to_point(segment.end));
    }
    match builder.build() {
        Ok(path) => window.paint_path(path, to_rgba(style.color)),
        Err(err) => tracing::trace!(?err, "skipping unbuildable path"),
    }
}

fn fill_rect(window: &mut Window, rect: ScreenRect, style: RectStyle) {
    window.paint_quad(quad(
        to_bounds(rect),
        Corners::all(px(0.0)),
        to_rgba(style.fill),
        Edges::all(px(style.stroke_width)),
        to_rgba(style.stroke),
        BorderStyle::default(),
    ));
}

fn draw_text(
    window: &mut Window,
    cx: &mut App,
    position: ScreenPoint,
    text: &str,
    style: &TextStyle,
) {
    if text.is_empty() {
        return;
    }
    let shaped = shape(window, text, style.size, to_hsla(style.color));
    let height = px(line_height(&shaped, style.size));
    if let Err(err) = shaped.paint(to_point(position), height, window, cx) {
        tracing::trace!(?err, text, "text paint failed");
    }
}

fn to_point(screen: ScreenPoint) -> gpui::Point<Pixels> {
    point(px(screen.x), px(screen.y))
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}

fn to_bounds(rect: ScreenRect) -> Bounds<Pixels> {
    Bounds::from_corners(to_point(rect.min), to_point(rect.max))
}
