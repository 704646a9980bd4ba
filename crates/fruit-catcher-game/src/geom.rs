use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box anchored at its top-left corner (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point2<f32>,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Point2::new(x, y),
            width,
            height,
        }
    }

    #[inline]
    pub fn max(&self) -> Point2<f32> {
        Point2::new(self.min.x + self.width, self.min.y + self.height)
    }

    /// Overlap with positive area. Boxes that only share an edge do not
    /// intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        let (a0, a1) = (self.min, self.max());
        let (b0, b1) = (other.min, other.max());
        a0.x.max(b0.x) < a1.x.min(b1.x) && a0.y.max(b0.y) < a1.y.min(b1.y)
    }
}
