//! GPUI integration for gpui_topology.
//!
//! This module provides a GPUI view that renders a
//! [`TopologyPanel`](crate::panel::TopologyPanel), shows event tooltips on
//! hover and turns drags into time range requests.

mod frame;
mod paint;
mod text;
mod view;

pub use view::{GpuiTopologyView, PanelHandle};
