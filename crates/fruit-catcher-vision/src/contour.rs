//! Outer-boundary extraction for connected foreground regions.
//!
//! Regions are 8-connected. Each region is discovered at its first pixel in
//! raster order and its outer border is followed with the Suzuki–Abe border
//! following step. Holes are not reported. A region sitting inside another
//! region's hole still yields its own boundary; its area is always smaller
//! than the enclosing region's, so it never wins a largest-area selection.

use std::collections::VecDeque;

use fruit_catcher_core::BinaryMask;
use nalgebra::Point2;

/// Neighbour offsets, clockwise on screen (y grows downward), starting east.
const DIRS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const WEST: usize = 4;

/// Closed outer boundary of one foreground region, in pixel coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<Point2<i64>>,
}

impl Contour {
    /// Area enclosed by the boundary polygon (shoelace formula).
    ///
    /// Single pixels and one-pixel-wide strokes enclose no area.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0i64;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            twice += p.x * q.y - q.x * p.y;
        }
        (twice as f64 * 0.5).abs()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Outer boundaries of every 8-connected region, in raster discovery order.
pub fn find_external_contours(mask: &BinaryMask) -> Vec<Contour> {
    let mut visited = vec![false; mask.width * mask.height];
    let mut out = Vec::new();

    for y in 0..mask.height {
        for x in 0..mask.width {
            let idx = y * mask.width + x;
            if visited[idx] || mask.data[idx] == 0 {
                continue;
            }
            flood_region(mask, &mut visited, x, y);
            out.push(follow_border(mask, Point2::new(x as i64, y as i64)));
        }
    }

    out
}

/// Index of the contour with the greatest area.
///
/// Ties keep the earlier contour; if every area is zero the first one is
/// returned.
pub fn largest_contour(contours: &[Contour]) -> Option<usize> {
    if contours.is_empty() {
        return None;
    }
    let mut best = 0usize;
    let mut best_area = 0.0f64;
    for (i, c) in contours.iter().enumerate() {
        let a = c.area();
        if a > best_area {
            best_area = a;
            best = i;
        }
    }
    Some(best)
}

fn flood_region(mask: &BinaryMask, visited: &mut [bool], x0: usize, y0: usize) {
    let mut queue = VecDeque::new();
    visited[y0 * mask.width + x0] = true;
    queue.push_back((x0 as i64, y0 as i64));

    while let Some((x, y)) = queue.pop_front() {
        for &(dx, dy) in &DIRS {
            let (nx, ny) = (x + dx, y + dy);
            if !mask.get(nx, ny) {
                continue;
            }
            let nidx = ny as usize * mask.width + nx as usize;
            if !visited[nidx] {
                visited[nidx] = true;
                queue.push_back((nx, ny));
            }
        }
    }
}

#[inline]
fn step(p: Point2<i64>, dir: usize) -> Point2<i64> {
    let (dx, dy) = DIRS[dir % 8];
    Point2::new(p.x + dx, p.y + dy)
}

fn direction_to(from: Point2<i64>, to: Point2<i64>) -> usize {
    let d = (to.x - from.x, to.y - from.y);
    DIRS.iter().position(|&o| o == d).unwrap_or(WEST)
}

/// Follow the outer border starting at the region's first raster pixel.
///
/// `start` has background to its west and on the row above, so the search
/// begins at the west neighbour.
fn follow_border(mask: &BinaryMask, start: Point2<i64>) -> Contour {
    let mut points = vec![start];

    let first = (1..=8)
        .map(|k| step(start, WEST + k))
        .find(|q| mask.get(q.x, q.y));
    let Some(first) = first else {
        return Contour { points };
    };

    let mut prev = first;
    let mut cur = start;
    loop {
        // Counterclockwise from the neighbour after `prev`; `prev` itself is
        // foreground, so the scan always finds something.
        let d = direction_to(cur, prev);
        let next = (1..=8)
            .map(|k| step(cur, d + 8 - k))
            .find(|q| mask.get(q.x, q.y))
            .unwrap_or(prev);

        if next == start && cur == first {
            break;
        }
        prev = cur;
        cur = next;
        points.push(cur);
    }

    Contour { points }
}
