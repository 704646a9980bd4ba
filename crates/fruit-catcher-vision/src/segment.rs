//! Color-window segmentation and binary morphology.

use fruit_catcher_core::{BinaryMask, HsvImageView};

use crate::calibrate::ColorWindow;

/// Foreground wherever every channel of the pixel lies inside `window`.
pub fn segment(img: &HsvImageView<'_>, window: &ColorWindow) -> BinaryMask {
    BinaryMask::from_fn(img.width, img.height, |x, y| {
        window.contains(img.data[y * img.width + x])
    })
}

/// Binary structuring element with its anchor at the center.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    width: usize,
    height: usize,
    /// Offsets (dx, dy) of the active cells relative to the anchor.
    offsets: Vec<(i64, i64)>,
}

impl StructuringElement {
    /// Filled ellipse inscribed in a `width`×`height` box.
    ///
    /// Each row `dy` spans `round(cx * sqrt(1 - dy²/r²))` cells on both sides
    /// of the center column, so a 5×5 element is a plus-shaped disc.
    pub fn ellipse(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let r = (height / 2) as i64;
        let c = (width / 2) as i64;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

        let mut offsets = Vec::new();
        for row in 0..height as i64 {
            let dy = row - r;
            let (j1, j2) = if dy.abs() <= r {
                let dx = (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as i64;
                ((c - dx).max(0), (c + dx + 1).min(width as i64))
            } else {
                (0, 0)
            };
            for col in j1..j2 {
                offsets.push((col - c, dy));
            }
        }

        Self {
            width,
            height,
            offsets,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn offsets(&self) -> &[(i64, i64)] {
        &self.offsets
    }
}

/// One erosion pass. Neighbours outside the mask are skipped, so the border
/// does not eat into foreground touching the frame edge.
pub fn erode(mask: &BinaryMask, se: &StructuringElement) -> BinaryMask {
    BinaryMask::from_fn(mask.width, mask.height, |x, y| {
        se.offsets().iter().all(|&(dx, dy)| {
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            !mask.in_bounds(nx, ny) || mask.get(nx, ny)
        })
    })
}

/// One dilation pass. Neighbours outside the mask never switch a pixel on.
pub fn dilate(mask: &BinaryMask, se: &StructuringElement) -> BinaryMask {
    BinaryMask::from_fn(mask.width, mask.height, |x, y| {
        se.offsets()
            .iter()
            .any(|&(dx, dy)| mask.get(x as i64 + dx, y as i64 + dy))
    })
}

/// Morphological opening: `iterations` erosions followed by as many dilations.
pub fn open(mask: &BinaryMask, se: &StructuringElement, iterations: usize) -> BinaryMask {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = erode(&out, se);
    }
    for _ in 0..iterations {
        out = dilate(&out, se);
    }
    out
}
