//! Topology panel: data, options and per-instance state in one place.
//!
//! A [`TopologyPanel`] owns everything that must not leak between panels on
//! the same dashboard: the palette cache, the drag gesture, the hover point
//! and the geometry of the last composed frame. The host feeds it series and
//! a time window, then asks it to [`compose`](TopologyPanel::compose) a frame
//! for given bounds.

use crate::axis::TickFormatter;
use crate::color::{Color, ColorCache, FieldColorResolver};
use crate::error::Result;
use crate::frame::RawSeries;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::interaction::{
    DragController, DragSelection, PointerInput, Propagation, SurfaceBinding, TimeRangeSink,
};
use crate::layout::{ChartLayout, DEFAULT_MARGIN_RATIO, LayoutInputs, recompute_layout};
use crate::options::PanelOptions;
pub use crate::render::TextMeasurer;
use crate::render::{
    RectStyle, RenderCommand, RenderList, TextStyle, Tooltip, build_events, build_graduations,
    build_selection, build_tooltip,
};
use crate::style::Theme;
use crate::topology::{Event, Line, NormalizeOptions, legend_entries, normalize};
use crate::view::TimeWindow;

/// Height of the header row in pixels.
pub const HEADER_LINE_HEIGHT: f32 = 40.0;

const PATH_COLUMN_GAP: f32 = 20.0;
const PATH_PADDING_RIGHT: f32 = 25.0;
const LEGEND_PADDING_LEFT: f32 = 25.0;
const LEGEND_PADDING_RIGHT: f32 = 10.0;
const LEGEND_MARKER_GAP: f32 = 10.0;
const LEGEND_MAX_WIDTH_RATIO: f32 = 0.2;

/// Behavior switches fixed when the panel is created.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Enable drag-to-select time ranges.
    pub drag_select: bool,
    /// Show event tooltips on hover.
    pub show_tooltip: bool,
    /// Share of the panel height used as the gap before each line.
    pub margin_ratio: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            drag_select: true,
            show_tooltip: true,
            margin_ratio: DEFAULT_MARGIN_RATIO,
        }
    }
}

/// One host update: query results, the active window and the panel size.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelData {
    /// Query results, one per line.
    pub series: Vec<RawSeries>,
    /// Active dashboard time window.
    pub window: TimeWindow,
    /// Panel width in pixels.
    pub width: f32,
    /// Panel height in pixels.
    pub height: f32,
}

/// Output of [`TopologyPanel::compose`].
#[derive(Debug, Clone, Default)]
pub struct PanelFrame {
    /// Commands to paint.
    pub render: RenderList,
    /// Chart area inside the panel bounds.
    pub chart: ScreenRect,
}

/// Topology timeline panel.
#[derive(Debug, Clone)]
pub struct TopologyPanel {
    options: PanelOptions,
    config: PanelConfig,
    theme: Theme,
    formatter: TickFormatter,
    colors: FieldColorResolver,
    series: Vec<RawSeries>,
    window: Option<TimeWindow>,
    lines: Vec<Line>,
    drag: DragController,
    hover: Option<ScreenPoint>,
    layout: ChartLayout,
    chart: ScreenRect,
}

impl TopologyPanel {
    /// Create a panel with the given options and default configuration.
    pub fn new(options: PanelOptions) -> Result<Self> {
        Self::builder().options(options).build()
    }

    /// Start building a panel with custom configuration.
    pub fn builder() -> PanelBuilder {
        PanelBuilder::default()
    }

    /// Access the options.
    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    /// Access the configuration.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Access the theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Access the normalized lines.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Access the current time window.
    pub fn window(&self) -> Option<TimeWindow> {
        self.window
    }

    /// Geometry of the last composed frame.
    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Chart area of the last composed frame.
    pub fn chart_rect(&self) -> ScreenRect {
        self.chart
    }

    /// Live drag selection.
    pub fn selection(&self) -> DragSelection {
        self.drag.selection()
    }

    /// Replace the options and renormalize.
    pub fn set_options(&mut self, options: PanelOptions) -> Result<()> {
        options.separator_char()?;
        self.options = options;
        self.renormalize();
        Ok(())
    }

    /// Replace the series and time window and renormalize.
    pub fn set_data(&mut self, series: Vec<RawSeries>, window: TimeWindow) {
        self.series = series;
        self.window = Some(window);
        self.renormalize();
    }

    /// Replace only the time window and renormalize.
    pub fn set_window(&mut self, window: TimeWindow) {
        self.window = Some(window);
        self.renormalize();
    }

    /// Apply a host update and compose the panel at the origin.
    pub fn update(&mut self, data: PanelData, measurer: &dyn TextMeasurer) -> PanelFrame {
        self.set_data(data.series, data.window);
        self.compose(
            ScreenRect::from_origin_size(0.0, 0.0, data.width, data.height),
            measurer,
        )
    }

    fn renormalize(&mut self) {
        let Some(window) = self.window else {
            self.lines.clear();
            return;
        };
        let separator = self.options.separator_char().unwrap_or('|');
        self.lines = normalize(
            &self.series,
            NormalizeOptions {
                separator,
                window_to: window.to(),
            },
            &mut self.colors,
        );
    }

    /// Listen for pointer input on a surface.
    pub fn attach_surface(&mut self, binding: SurfaceBinding) {
        self.drag.attach(binding);
    }

    /// Stop listening for pointer input.
    pub fn detach_surface(&mut self) {
        self.drag.detach();
    }

    /// Handle a pointer press.
    pub fn pointer_down(&mut self, input: PointerInput) -> Propagation {
        if !self.config.drag_select {
            return Propagation::Continue;
        }
        self.drag.pointer_down(input)
    }

    /// Handle a pointer move.
    pub fn pointer_move(&mut self, input: PointerInput) -> Propagation {
        if !self.config.drag_select {
            return Propagation::Continue;
        }
        self.drag.pointer_move(input)
    }

    /// Handle a pointer release, sending any selected range to `sink`.
    pub fn pointer_up(&mut self, input: PointerInput, sink: &mut dyn TimeRangeSink) -> Propagation {
        if !self.config.drag_select {
            return Propagation::Continue;
        }
        self.drag.pointer_up(input, self.layout.transform(), sink)
    }

    /// Track the cursor for tooltips; `None` when it leaves the panel.
    pub fn set_hover(&mut self, cursor: Option<ScreenPoint>) {
        self.hover = cursor;
    }

    /// Event under the hover cursor in the last composed frame.
    pub fn hovered_event(&self) -> Option<&Event> {
        let cursor = self.hover?;
        if !self.chart.contains(cursor) {
            return None;
        }
        let local = ScreenPoint::new(cursor.x - self.chart.min.x, cursor.y - self.chart.min.y);
        let hit = self.layout.hit_test(local)?;
        self.lines.get(hit.line)?.events.get(hit.index)
    }

    /// Lay out and build render commands for the panel within `bounds`.
    pub fn compose(&mut self, bounds: ScreenRect, measurer: &dyn TextMeasurer) -> PanelFrame {
        if !bounds.is_valid() {
            self.layout = ChartLayout::empty();
            return PanelFrame::default();
        }
        let mut render = RenderList::new();

        let headers = self.options.header_labels();
        let header_height = if headers.is_some() {
            HEADER_LINE_HEIGHT
        } else {
            0.0
        };
        let margin = bounds.height() as f64 * self.config.margin_ratio;
        let font_size = self.theme.font_size;

        let columns = path_columns(&self.lines, headers.as_deref(), measurer, font_size);
        let path_width = if columns.is_empty() {
            0.0
        } else {
            columns.iter().sum::<f32>()
                + PATH_COLUMN_GAP * (columns.len() - 1) as f32
                + PATH_PADDING_RIGHT
        };
        let legend = if self.options.show_legend {
            legend_entries(&self.lines)
        } else {
            Vec::new()
        };
        let legend_width = if legend.is_empty() {
            0.0
        } else {
            let label_width = legend
                .iter()
                .map(|(label, _)| measurer.measure(label, font_size * 0.9).0)
                .fold(0.0, f32::max);
            (LEGEND_PADDING_LEFT + font_size + LEGEND_MARKER_GAP + label_width + LEGEND_PADDING_RIGHT)
                .min(bounds.width() * LEGEND_MAX_WIDTH_RATIO)
        };

        let chart = ScreenRect::new(
            ScreenPoint::new(bounds.min.x + path_width, bounds.min.y + header_height),
            ScreenPoint::new(bounds.max.x - legend_width, bounds.max.y),
        );
        self.chart = chart;
        self.layout = match self.window {
            Some(window) if chart.is_valid() => recompute_layout(
                &self.lines,
                &LayoutInputs {
                    width: chart.width() as f64,
                    height: chart.height() as f64,
                    window,
                    margin,
                },
            ),
            _ => ChartLayout::empty(),
        };

        if let Some(headers) = &headers {
            self.build_headers(&mut render, headers, &columns, bounds, measurer);
        }
        self.build_paths(&mut render, &columns, chart, bounds.min.x, measurer);
        build_graduations(&mut render, &self.layout, chart, &self.theme, &self.formatter);
        build_events(&mut render, &self.lines, &self.layout, chart, &self.theme);
        if self.config.drag_select {
            build_selection(&mut render, &self.drag.selection(), chart, &self.theme);
        }
        if !legend.is_empty() {
            let rect = ScreenRect::new(
                ScreenPoint::new(bounds.max.x - legend_width, bounds.min.y),
                bounds.max,
            );
            build_legend(&mut render, &legend, rect, &self.theme, measurer);
        }
        if self.config.show_tooltip
            && !self.drag.is_dragging()
            && let (Some(event), Some(cursor)) = (self.hovered_event(), self.hover)
        {
            build_tooltip(
                &mut render,
                &Tooltip::for_event(event),
                cursor,
                bounds,
                &self.theme,
                measurer,
            );
        }

        PanelFrame { render, chart }
    }

    fn build_headers(
        &self,
        render: &mut RenderList,
        headers: &[String],
        columns: &[f32],
        bounds: ScreenRect,
        measurer: &dyn TextMeasurer,
    ) {
        let size = self.theme.font_size;
        let mut x = bounds.min.x;
        for (index, label) in headers.iter().enumerate() {
            let height = measurer.measure(label, size).1;
            render.push(RenderCommand::Text {
                position: ScreenPoint::new(
                    x,
                    bounds.min.y + (HEADER_LINE_HEIGHT - height).max(0.0) * 0.5,
                ),
                text: label.clone(),
                style: TextStyle {
                    color: self.theme.text,
                    size,
                },
            });
            let Some(width) = columns.get(index) else {
                break;
            };
            x += width + PATH_COLUMN_GAP;
        }
    }

    fn build_paths(
        &self,
        render: &mut RenderList,
        columns: &[f32],
        chart: ScreenRect,
        left: f32,
        measurer: &dyn TextMeasurer,
    ) {
        let size = self.theme.font_size;
        for (line, band) in self.lines.iter().zip(&self.layout.bands) {
            let mut x = left;
            for (segment, width) in line.path.iter().zip(columns) {
                if !segment.is_empty() {
                    let height = measurer.measure(segment, size).1;
                    render.push(RenderCommand::Text {
                        position: ScreenPoint::new(
                            x,
                            chart.min.y + band.top + (band.height - height).max(0.0) * 0.5,
                        ),
                        text: segment.clone(),
                        style: TextStyle {
                            color: self.theme.text,
                            size,
                        },
                    });
                }
                x += width + PATH_COLUMN_GAP;
            }
        }
    }
}

fn path_columns(
    lines: &[Line],
    headers: Option<&[String]>,
    measurer: &dyn TextMeasurer,
    size: f32,
) -> Vec<f32> {
    let count = lines.iter().map(|line| line.path.len()).max().unwrap_or(0);
    let mut columns = vec![0.0_f32; count];
    let labels = lines
        .iter()
        .flat_map(|line| line.path.iter().enumerate())
        .chain(headers.into_iter().flatten().enumerate());
    for (index, label) in labels {
        if let Some(column) = columns.get_mut(index) {
            *column = column.max(measurer.measure(label, size).0);
        }
    }
    columns
}

fn build_legend(
    render: &mut RenderList,
    entries: &[(String, Color)],
    rect: ScreenRect,
    theme: &Theme,
    measurer: &dyn TextMeasurer,
) {
    let size = theme.font_size * 0.9;
    let row_height = size * 1.2 + 4.0;
    let marker_x = rect.min.x + LEGEND_PADDING_LEFT;
    render.push(RenderCommand::ClipRect(rect));
    for (index, (label, color)) in entries.iter().enumerate() {
        let top = rect.min.y + index as f32 * row_height;
        if top > rect.max.y {
            break;
        }
        let center = top + row_height * 0.5;
        render.push(RenderCommand::Rect {
            rect: ScreenRect::from_origin_size(marker_x, center - 2.0, theme.font_size, 4.0),
            style: RectStyle {
                fill: *color,
                stroke: *color,
                stroke_width: 0.0,
            },
        });
        let height = measurer.measure(label, size).1;
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(
                marker_x + theme.font_size + LEGEND_MARKER_GAP,
                center - height * 0.5,
            ),
            text: label.clone(),
            style: TextStyle {
                color: theme.text,
                size,
            },
        });
    }
    render.push(RenderCommand::ClipEnd);
}

/// Builder for configuring a panel before construction.
#[derive(Debug, Default)]
pub struct PanelBuilder {
    options: PanelOptions,
    config: PanelConfig,
    theme: Theme,
    formatter: TickFormatter,
    colors: Option<ColorCache>,
}

impl PanelBuilder {
    /// Set the user options.
    pub fn options(mut self, options: PanelOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the behavior switches.
    pub fn config(mut self, config: PanelConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable drag-to-select.
    pub fn drag_select(mut self, enabled: bool) -> Self {
        self.config.drag_select = enabled;
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the graduation label formatter.
    pub fn formatter(mut self, formatter: TickFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Use a custom palette for values without a configured color.
    pub fn palette(mut self, palette: Vec<Color>) -> Self {
        self.colors = Some(ColorCache::with_palette(palette));
        self
    }

    /// Build the panel, validating the options.
    pub fn build(self) -> Result<TopologyPanel> {
        self.options.separator_char()?;
        Ok(TopologyPanel {
            options: self.options,
            config: self.config,
            theme: self.theme,
            formatter: self.formatter,
            colors: FieldColorResolver::with_cache(self.colors.unwrap_or_default()),
            series: Vec::new(),
            window: None,
            lines: Vec::new(),
            drag: DragController::new(),
            hover: None,
            layout: ChartLayout::empty(),
            chart: ScreenRect::default(),
        })
    }
}
