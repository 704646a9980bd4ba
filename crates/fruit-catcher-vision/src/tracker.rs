use fruit_catcher_core::{BinaryMask, HsvImageView};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::calibrate::ColorWindow;
use crate::circle::min_enclosing_circle;
use crate::contour::{find_external_contours, largest_contour};
use crate::segment::{open, segment, StructuringElement};

/// Denoising settings for the marker mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerParams {
    /// Side of the elliptical structuring element.
    pub kernel_size: usize,
    /// Erosions (and then as many dilations) of the opening.
    pub open_iterations: usize,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            open_iterations: 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingSource {
    /// Measured on the current frame.
    Found,
    /// Carried over because the current frame had no contour.
    #[default]
    Stale,
}

/// Per-marker tracking state for one tick.
///
/// `Default` is the reading before any contour has ever been seen: a zero
/// centroid and radius, marked stale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackReading {
    pub centroid: Point2<f32>,
    pub radius: f32,
    pub source: ReadingSource,
    /// Consecutive ticks without a contour; 0 for a fresh measurement.
    pub stale_ticks: u32,
}

impl Default for TrackReading {
    fn default() -> Self {
        Self {
            centroid: Point2::origin(),
            radius: 0.0,
            source: ReadingSource::Stale,
            stale_ticks: 0,
        }
    }
}

impl TrackReading {
    pub fn found(centroid: Point2<f32>, radius: f32) -> Self {
        Self {
            centroid,
            radius,
            source: ReadingSource::Found,
            stale_ticks: 0,
        }
    }

    /// Same measurement, one more tick out of date.
    pub fn carried(self) -> Self {
        Self {
            source: ReadingSource::Stale,
            stale_ticks: self.stale_ticks.saturating_add(1),
            ..self
        }
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        self.source == ReadingSource::Found
    }
}

/// Segment → open → contours → largest area → enclosing circle.
#[derive(Clone, Debug)]
pub struct MarkerTracker {
    params: TrackerParams,
    kernel: StructuringElement,
}

impl Default for MarkerTracker {
    fn default() -> Self {
        Self::new(TrackerParams::default())
    }
}

impl MarkerTracker {
    pub fn new(params: TrackerParams) -> Self {
        let kernel = StructuringElement::ellipse(params.kernel_size, params.kernel_size);
        Self { params, kernel }
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    /// Denoised foreground mask of `window` on `frame`.
    pub fn mask(&self, frame: &HsvImageView<'_>, window: &ColorWindow) -> BinaryMask {
        let raw = segment(frame, window);
        open(&raw, &self.kernel, self.params.open_iterations)
    }

    /// Track one marker. Never fails: a frame without any contour yields
    /// `previous` marked stale.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, window, previous), fields(width = frame.width, height = frame.height))
    )]
    pub fn track(
        &self,
        frame: &HsvImageView<'_>,
        window: &ColorWindow,
        previous: &TrackReading,
    ) -> TrackReading {
        let mask = self.mask(frame, window);
        self.track_mask(&mask, previous)
    }

    /// Contour and circle stages on an already denoised mask.
    pub fn track_mask(&self, mask: &BinaryMask, previous: &TrackReading) -> TrackReading {
        let contours = find_external_contours(mask);
        let Some(best) = largest_contour(&contours) else {
            if previous.is_found() {
                debug!("marker lost, holding last position");
            }
            return previous.carried();
        };

        match min_enclosing_circle(&contours[best].points) {
            Some(circle) => {
                if !previous.is_found() {
                    debug!(
                        "marker found at ({:.1}, {:.1}) r={:.1}",
                        circle.center.x, circle.center.y, circle.radius
                    );
                }
                TrackReading::found(circle.center, circle.radius)
            }
            None => previous.carried(),
        }
    }
}
