//! Geometric primitives used by the layout pipeline.
//!
//! All coordinates are logical pixels. Chart-local coordinates have their
//! origin at the top-left corner of the chart area.

/// A point in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    /// X value in screen pixels.
    pub x: f32,
    /// Y value in screen pixels.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from its origin and size.
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(ScreenPoint::new(x, y), ScreenPoint::new(x + width, y + height))
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Check whether a point lies inside the rectangle (edges included).
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Shift the rectangle by an offset.
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(
            ScreenPoint::new(self.min.x + dx, self.min.y + dy),
            ScreenPoint::new(self.max.x + dx, self.max.y + dy),
        )
    }
}

/// Vertical slot allocated to one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Top edge in chart-local pixels.
    pub top: f32,
    /// Band height in pixels.
    pub height: f32,
}

/// Clamp a box of `size` so it stays inside `rect` where possible.
pub fn clamp_point(point: ScreenPoint, rect: ScreenRect, size: (f32, f32)) -> ScreenPoint {
    let mut x = point.x;
    let mut y = point.y;
    if x + size.0 > rect.max.x {
        x = rect.max.x - size.0;
    }
    if y + size.1 > rect.max.y {
        y = rect.max.y - size.1;
    }
    if x < rect.min.x {
        x = rect.min.x;
    }
    if y < rect.min.y {
        y = rect.min.y;
    }
    ScreenPoint::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_includes_edges() {
        let rect = ScreenRect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(ScreenPoint::new(10.0, 0.0)));
        assert!(!rect.contains(ScreenPoint::new(10.5, 5.0)));
    }

    #[test]
    fn clamp_keeps_box_inside() {
        let rect = ScreenRect::from_origin_size(0.0, 0.0, 100.0, 50.0);
        let clamped = clamp_point(ScreenPoint::new(90.0, 45.0), rect, (30.0, 20.0));
        assert_eq!(clamped, ScreenPoint::new(70.0, 30.0));
    }
}
