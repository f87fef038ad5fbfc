use std::sync::{Arc, RwLock};

use gpui::prelude::*;
use gpui::{
    App, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Point, Window, canvas,
    div,
};

use crate::geom::ScreenPoint;
use crate::interaction::{PointerInput, Propagation, SurfaceId};
use crate::panel::TopologyPanel;
use crate::view::TimeWindow;

use super::frame::build_frame;
use super::paint::{paint_frame, to_hsla};

type TimeRangeCallback = Arc<dyn Fn(TimeWindow, &mut App) + Send + Sync>;

/// A GPUI view that renders a [`TopologyPanel`].
///
/// Hovering an event shows its tooltip until the cursor leaves the view.
/// Dragging across the chart selects a time range, which is handed to the
/// callback set with [`on_time_range`](Self::on_time_range); a release
/// outside the view still finishes the drag.
#[derive(Clone)]
pub struct GpuiTopologyView {
    panel: Arc<RwLock<TopologyPanel>>,
    surface: SurfaceId,
    on_time_range: Option<TimeRangeCallback>,
}

impl GpuiTopologyView {
    /// Create a new GPUI view for the given panel.
    pub fn new(panel: TopologyPanel) -> Self {
        Self {
            panel: Arc::new(RwLock::new(panel)),
            surface: SurfaceId::next(),
            on_time_range: None,
        }
    }

    /// Call `callback` with every time range selected by dragging.
    ///
    /// The panel is not locked while the callback runs, so it may update the
    /// panel through a [`PanelHandle`].
    pub fn on_time_range(
        mut self,
        callback: impl Fn(TimeWindow, &mut App) + Send + Sync + 'static,
    ) -> Self {
        self.on_time_range = Some(Arc::new(callback));
        self
    }

    /// Get a handle for mutating the underlying panel.
    ///
    /// This is useful for pushing query results from async tasks.
    pub fn panel_handle(&self) -> PanelHandle {
        PanelHandle {
            panel: Arc::clone(&self.panel),
        }
    }

    fn pointer(&self, position: Point<Pixels>) -> PointerInput {
        PointerInput {
            surface: self.surface,
            screen_x: f64::from(f32::from(position.x)),
        }
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        let input = self.pointer(ev.position);
        let propagation = self.panel.write().expect("panel lock").pointer_down(input);
        if propagation == Propagation::Stop {
            cx.stop_propagation();
        }
        cx.notify();
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let input = self.pointer(ev.position);
        let mut panel = self.panel.write().expect("panel lock");
        panel.set_hover(Some(screen_point(ev.position)));
        if panel.pointer_move(input) == Propagation::Stop {
            cx.stop_propagation();
        }
        cx.notify();
    }

    fn on_hover_change(&mut self, hovered: bool, cx: &mut Context<Self>) {
        if !hovered {
            self.panel.write().expect("panel lock").set_hover(None);
            cx.notify();
        }
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        let input = self.pointer(ev.position);
        let mut requested = Vec::new();
        let propagation = self
            .panel
            .write()
            .expect("panel lock")
            .pointer_up(input, &mut |range: TimeWindow| requested.push(range));
        if propagation == Propagation::Stop {
            cx.stop_propagation();
        }
        if let Some(callback) = &self.on_time_range {
            for range in requested {
                callback(range, cx);
            }
        }
        cx.notify();
    }
}

impl Render for GpuiTopologyView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let panel = Arc::clone(&self.panel);
        let surface = self.surface;
        let background = panel.read().expect("panel lock").theme().background;

        div()
            .id("topology-view")
            .size_full()
            .bg(to_hsla(background))
            .child(
                canvas(
                    move |bounds, window, _| {
                        let mut panel = panel.write().expect("panel lock");
                        if !bounds.contains(&window.mouse_position()) {
                            panel.set_hover(None);
                        }
                        build_frame(&mut panel, surface, bounds, window)
                    },
                    move |_, frame, window, cx| {
                        paint_frame(&frame, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_mouse_up_out(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_hover(cx.listener(|this, hovered: &bool, _, cx| {
                this.on_hover_change(*hovered, cx);
            }))
    }
}

/// A handle for mutating a [`TopologyPanel`] held inside a `GpuiTopologyView`.
///
/// The handle clones cheaply and can be moved into async tasks.
#[derive(Clone)]
pub struct PanelHandle {
    panel: Arc<RwLock<TopologyPanel>>,
}

impl PanelHandle {
    /// Read the panel state.
    ///
    /// The panel is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&TopologyPanel) -> R) -> R {
        let panel = self.panel.read().expect("panel lock");
        f(&panel)
    }

    /// Mutate the panel state.
    ///
    /// The panel is locked for the duration of the callback.
    pub fn write<R>(&self, f: impl FnOnce(&mut TopologyPanel) -> R) -> R {
        let mut panel = self.panel.write().expect("panel lock");
        f(&mut panel)
    }
}

fn screen_point(point: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(point.x), f32::from(point.y))
}
