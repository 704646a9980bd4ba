//! Minimum enclosing circle of a point set.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-7;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnclosingCircle {
    pub center: Point2<f32>,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug)]
struct Circle {
    c: Point2<f64>,
    r: f64,
}

impl Circle {
    #[inline]
    fn contains(&self, p: &Point2<f64>) -> bool {
        (p - self.c).norm() <= self.r * (1.0 + EPS) + EPS
    }

    fn from_two(a: &Point2<f64>, b: &Point2<f64>) -> Self {
        let c = nalgebra::center(a, b);
        Self {
            c,
            r: (a - c).norm(),
        }
    }

    /// Circumcircle, or the widest two-point circle when the points are collinear.
    fn from_three(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Self {
        let (bx, by) = (b.x - a.x, b.y - a.y);
        let (cx, cy) = (c.x - a.x, c.y - a.y);
        let d = 2.0 * (bx * cy - by * cx);
        if d.abs() < 1e-12 {
            let candidates = [Self::from_two(a, b), Self::from_two(a, c), Self::from_two(b, c)];
            return candidates
                .into_iter()
                .fold(candidates[0], |best, k| if k.r > best.r { k } else { best });
        }
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        Self {
            c: Point2::new(a.x + ux, a.y + uy),
            r: (ux * ux + uy * uy).sqrt(),
        }
    }
}

/// Smallest circle containing every point, or `None` for an empty set.
///
/// Incremental construction: whenever a point falls outside the current
/// circle it must lie on the boundary of the next one, which nests the search
/// down to circles fixed by two and then three boundary points.
pub fn min_enclosing_circle(points: &[Point2<i64>]) -> Option<EnclosingCircle> {
    let pts: Vec<Point2<f64>> = points
        .iter()
        .map(|p| Point2::new(p.x as f64, p.y as f64))
        .collect();
    let first = *pts.first()?;

    let mut circle = Circle { c: first, r: 0.0 };
    for i in 1..pts.len() {
        if circle.contains(&pts[i]) {
            continue;
        }
        circle = Circle { c: pts[i], r: 0.0 };
        for j in 0..i {
            if circle.contains(&pts[j]) {
                continue;
            }
            circle = Circle::from_two(&pts[i], &pts[j]);
            for k in 0..j {
                if !circle.contains(&pts[k]) {
                    circle = Circle::from_three(&pts[i], &pts[j], &pts[k]);
                }
            }
        }
    }

    Some(EnclosingCircle {
        center: Point2::new(circle.c.x as f32, circle.c.y as f32),
        radius: circle.r as f32,
    })
}
