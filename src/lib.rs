//! gpui_topology draws topology timelines for GPUI.
//! Each series becomes one line of colored state intervals, labeled by its
//! hierarchical path, with hover tooltips and drag-to-select time ranges.

#![forbid(unsafe_code)]

pub mod axis;
pub mod color;
pub mod duration;
pub mod error;
pub mod frame;
pub mod geom;
pub mod interaction;
pub mod layout;
pub mod options;
pub mod panel;
pub mod render;
pub mod style;
pub mod topology;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use axis::{Tick, TickFormatter};
pub use color::{Color, ColorCache, ColorResolver, FieldColorResolver};
pub use duration::format_duration;
pub use error::{Result, TopologyError};
pub use frame::{Field, FieldConfig, FieldValue, RawSeries, Threshold, ThresholdsConfig, ValueMapping};
pub use geom::{ScreenPoint, ScreenRect};
pub use interaction::{
    DragController, DragSelection, PointerInput, Propagation, ScreenTransform, SurfaceBinding,
    SurfaceId, TimeRangeSink,
};
pub use layout::{ChartLayout, LayoutInputs, recompute_layout};
pub use options::PanelOptions;
pub use panel::{PanelBuilder, PanelConfig, PanelData, PanelFrame, TextMeasurer, TopologyPanel};
pub use render::{RenderCommand, RenderList};
pub use style::Theme;
pub use topology::{Event, Line, NormalizeOptions, normalize};
pub use transform::TimeTransform;
pub use view::{TimeWindow, Timestamp};
