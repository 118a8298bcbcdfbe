/// Pointer and viewport primitives shared by the gesture engine and its hosts.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPoint {
    pub x: f64,
    pub y: f64,
}

impl PointerPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when `self` is more than `threshold` away from `origin` along either axis.
    pub fn exceeds_axis_distance(self, origin: PointerPoint, threshold: f64) -> bool {
        (self.x - origin.x).abs() > threshold || (self.y - origin.y).abs() > threshold
    }
}

/// Visible band of the scroll container, in the same coordinate space as pointer points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub top: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointerId(pub u64);

impl PointerId {
    pub const PRIMARY: PointerId = PointerId(0);
}
