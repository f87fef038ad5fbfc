use gpui::{Hsla, ShapedLine, TextRun, Window, font, px};

use crate::render::TextMeasurer;

const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Shape a single line of UI text.
pub(crate) fn shape(window: &Window, text: &str, size: f32, color: Hsla) -> ShapedLine {
    let run = TextRun {
        len: text.len(),
        font: font(".SystemUIFont"),
        color,
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    window
        .text_system()
        .shape_line(text.to_string().into(), px(size), &[run], None)
}

/// Line height for shaped text, never tighter than the nominal ratio.
pub(crate) fn line_height(shaped: &ShapedLine, size: f32) -> f32 {
    f32::from(shaped.ascent + shaped.descent).max(size * LINE_HEIGHT_RATIO)
}

pub(crate) struct GpuiTextMeasurer<'a> {
    window: &'a Window,
}

impl<'a> GpuiTextMeasurer<'a> {
    pub(crate) fn new(window: &'a Window) -> Self {
        Self { window }
    }
}

impl TextMeasurer for GpuiTextMeasurer<'_> {
    fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        if text.is_empty() {
            return (0.0, size * LINE_HEIGHT_RATIO);
        }
        let shaped = shape(self.window, text, size, gpui::black());
        (f32::from(shaped.width), line_height(&shaped, size))
    }
}
