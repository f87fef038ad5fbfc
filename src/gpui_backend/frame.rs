use gpui::{Bounds, Pixels, Window};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::interaction::{ScreenTransform, SurfaceBinding, SurfaceId};
use crate::panel::TopologyPanel;
use crate::render::RenderList;

use super::text::GpuiTextMeasurer;

#[derive(Debug, Clone)]
pub(crate) struct TopologyFrame {
    pub(crate) render: RenderList,
}

/// Compose the panel for this frame and rebind its pointer surface.
///
/// Pointer positions arrive in window coordinates, so the surface transform
/// is a plain offset to the chart's left edge.
pub(crate) fn build_frame(
    panel: &mut TopologyPanel,
    surface: SurfaceId,
    bounds: Bounds<Pixels>,
    window: &Window,
) -> TopologyFrame {
    let rect = to_screen_rect(bounds);
    if rect.width() <= 1.0 || rect.height() <= 1.0 {
        return TopologyFrame {
            render: RenderList::new(),
        };
    }

    let measurer = GpuiTextMeasurer::new(window);
    let frame = panel.compose(rect, &measurer);
    panel.attach_surface(SurfaceBinding {
        id: surface,
        transform: Some(ScreenTransform::translate(frame.chart.min.x as f64)),
    });
    TopologyFrame {
        render: frame.render,
    }
}

fn to_screen_rect(bounds: Bounds<Pixels>) -> ScreenRect {
    let origin = ScreenPoint::new(f32::from(bounds.origin.x), f32::from(bounds.origin.y));
    ScreenRect::from_origin_size(
        origin.x,
        origin.y,
        f32::from(bounds.size.width),
        f32::from(bounds.size.height),
    )
}
