#[cfg(test)]
#[path = "point_test.rs"]
mod point_test;

use serde::Serialize;

/// A point in canvas pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point { x: self.x + dx, y: self.y + dy }
    }
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp a centre coordinate so an entity of diameter `size` stays inside
    /// `[size / 2, extent - size / 2]`.
    ///
    /// When the extent is narrower than the entity there is no such range; the
    /// coordinate is pinned to the middle of the extent instead.
    #[must_use]
    pub fn clamp_axis(value: f64, size: f64, extent: f64) -> f64 {
        let lo = size / 2.0;
        let hi = extent - size / 2.0;
        if lo > hi {
            return extent / 2.0;
        }
        value.clamp(lo, hi)
    }

    /// Clamp `center` on both axes for an entity of diameter `size`.
    #[must_use]
    pub fn clamp(&self, center: Point, size: f64) -> Point {
        Point {
            x: Self::clamp_axis(center.x, size, self.width),
            y: Self::clamp_axis(center.y, size, self.height),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}
