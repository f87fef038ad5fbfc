//! Visual theme for topology charts.

use crate::color::Color;

/// Colors and sizes used when building render commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Panel background.
    pub background: Color,
    /// Primary text (paths, headers, legend).
    pub text: Color,
    /// Graduation label text.
    pub tick_text: Color,
    /// Graduation lines and tooltip borders.
    pub border: Color,
    /// Tooltip background.
    pub tooltip_bg: Color,
    /// Drag selection fill.
    pub selection_fill: Color,
    /// Fill alpha applied to event colors.
    pub event_fill_alpha: f32,
    /// Base font size in pixels.
    pub font_size: f32,
}

impl Theme {
    /// Dark dashboard theme.
    pub fn dark() -> Self {
        Self {
            background: Color::hex(0x181B1F),
            text: Color::hex(0xCCCCDC),
            tick_text: Color::rgb8(204, 204, 220),
            border: Color::new(0.8, 0.8, 0.86, 0.2),
            tooltip_bg: Color::hex(0x181B1F),
            selection_fill: Color::new(0.0, 0.0, 0.0, 0.2),
            event_fill_alpha: 0.4,
            font_size: 12.0,
        }
    }

    /// Light dashboard theme.
    pub fn light() -> Self {
        Self {
            background: Color::WHITE,
            text: Color::hex(0x24292E),
            tick_text: Color::hex(0x464C54),
            border: Color::new(0.14, 0.16, 0.18, 0.2),
            tooltip_bg: Color::WHITE,
            selection_fill: Color::new(0.0, 0.0, 0.0, 0.2),
            event_fill_alpha: 0.4,
            font_size: 12.0,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
