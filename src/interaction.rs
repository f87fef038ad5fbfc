//! Drag-to-select time range gesture.
//!
//! The controller tracks one horizontal drag over the chart surface. Pointer
//! positions arrive in screen coordinates and are converted to chart-local
//! units through the screen transform of the surface the controller is
//! attached to. Without a surface, or without a transform, nothing is
//! tracked.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::geom::ScreenRect;
use crate::transform::TimeTransform;
use crate::view::TimeWindow;

static SURFACE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of a drawing surface pointer input is delivered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Allocate a fresh surface identity.
    pub fn next() -> Self {
        Self(SURFACE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Horizontal screen transform of a surface: `local = (screen - offset) / scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    scale: f64,
    offset: f64,
}

impl ScreenTransform {
    /// Create a transform; the scale must be finite and non-zero.
    pub fn new(scale: f64, offset: f64) -> Option<Self> {
        if !scale.is_finite() || scale == 0.0 || !offset.is_finite() {
            return None;
        }
        Some(Self { scale, offset })
    }

    /// Transform of an unscaled surface whose left edge sits at `offset`.
    pub fn translate(offset: f64) -> Self {
        Self { scale: 1.0, offset }
    }

    /// Convert a screen x coordinate into chart-local units.
    pub fn to_local(&self, screen_x: f64) -> f64 {
        (screen_x - self.offset) / self.scale
    }
}

/// Surface the controller listens on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBinding {
    /// Surface identity.
    pub id: SurfaceId,
    /// Current screen transform; `None` until the surface is mounted.
    pub transform: Option<ScreenTransform>,
}

/// Pointer input delivered by a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Surface that received the input.
    pub surface: SurfaceId,
    /// Pointer x in screen coordinates.
    pub screen_x: f64,
}

/// Whether an input should continue to the host's own handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// The controller ignored the input.
    Continue,
    /// The controller consumed the input.
    Stop,
}

/// Receiver of time range requests, typically the host's time picker.
pub trait TimeRangeSink {
    /// Replace the active window with `range` and record it in history.
    fn request_time_range(&mut self, range: TimeWindow);
}

impl<F> TimeRangeSink for F
where
    F: FnMut(TimeWindow),
{
    fn request_time_range(&mut self, range: TimeWindow) {
        self(range)
    }
}

/// Live selection state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragSelection {
    /// Whether a drag is in progress.
    pub dragging: bool,
    /// Chart-local x where the drag started.
    pub start_x: f64,
    /// Chart-local x of the latest pointer position.
    pub end_x: f64,
}

impl DragSelection {
    /// Width of the drawn selection; right-to-left drags draw nothing.
    pub fn visible_width(&self) -> f64 {
        if self.dragging {
            (self.end_x - self.start_x).max(0.0)
        } else {
            0.0
        }
    }

    /// Selection rectangle spanning the chart height while dragging.
    pub fn rect(&self, height: f32) -> Option<ScreenRect> {
        if !self.dragging {
            return None;
        }
        Some(ScreenRect::from_origin_size(
            self.start_x as f32,
            0.0,
            self.visible_width() as f32,
            height,
        ))
    }
}

/// State machine for drag selection: idle until a press, dragging until a
/// release or an out-of-bounds move.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    surface: Option<SurfaceBinding>,
    selection: DragSelection,
}

impl DragController {
    /// Create a detached controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the live selection.
    pub fn selection(&self) -> DragSelection {
        self.selection
    }

    /// Check whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.selection.dragging
    }

    /// Access the bound surface.
    pub fn surface(&self) -> Option<SurfaceBinding> {
        self.surface
    }

    /// Listen on a surface.
    ///
    /// Re-attaching the same surface only refreshes its transform. A
    /// different surface replaces the old one and abandons any drag in
    /// progress; input from the old surface is ignored from then on.
    pub fn attach(&mut self, binding: SurfaceBinding) {
        match self.surface {
            Some(current) if current.id == binding.id => {}
            _ => {
                if self.surface.is_some() {
                    tracing::debug!(surface = ?binding.id, "rebinding drag surface");
                }
                self.selection = DragSelection::default();
            }
        }
        self.surface = Some(binding);
    }

    /// Stop listening and abandon any drag in progress.
    pub fn detach(&mut self) {
        self.surface = None;
        self.selection = DragSelection::default();
    }

    /// Handle a pointer press.
    pub fn pointer_down(&mut self, input: PointerInput) -> Propagation {
        let Some(x) = self.local_x(input) else {
            return Propagation::Continue;
        };
        self.selection = DragSelection {
            dragging: true,
            start_x: x,
            end_x: x,
        };
        Propagation::Stop
    }

    /// Handle a pointer move; moving left of the chart cancels the drag.
    pub fn pointer_move(&mut self, input: PointerInput) -> Propagation {
        if !self.selection.dragging {
            return Propagation::Continue;
        }
        let Some(x) = self.local_x(input) else {
            return Propagation::Continue;
        };
        if x >= 0.0 {
            self.selection.end_x = x;
        } else {
            tracing::debug!(x, "drag left the chart, cancelled");
            self.selection = DragSelection::default();
        }
        Propagation::Stop
    }

    /// Handle a pointer release, sending the selected range to `sink`.
    ///
    /// The range is ordered before it is sent. A release that selects no
    /// time (a plain click) sends nothing, and so does a release left of the
    /// chart or one without a time mapping for the current frame.
    pub fn pointer_up(
        &mut self,
        input: PointerInput,
        time: Option<&TimeTransform>,
        sink: &mut dyn TimeRangeSink,
    ) -> Propagation {
        let Some(x) = self.local_x(input) else {
            return Propagation::Continue;
        };
        if !self.selection.dragging {
            return Propagation::Stop;
        }
        self.selection.dragging = false;
        if x < 0.0 {
            self.selection = DragSelection::default();
            return Propagation::Stop;
        }
        self.selection.end_x = x;

        let Some(time) = time else {
            return Propagation::Stop;
        };
        let start = time.x_to_time(self.selection.start_x);
        let end = time.x_to_time(self.selection.end_x);
        match TimeWindow::ordered(start, end) {
            Some(range) => {
                tracing::debug!(from = range.from(), to = range.to(), "time range selected");
                sink.request_time_range(range);
            }
            None => tracing::trace!("empty drag selection ignored"),
        }
        Propagation::Stop
    }

    fn local_x(&self, input: PointerInput) -> Option<f64> {
        let surface = self.surface?;
        if surface.id != input.surface {
            return None;
        }
        Some(surface.transform?.to_local(input.screen_x))
    }
}
