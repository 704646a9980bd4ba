//! Two-marker color tracking for the fruit-catcher control loop.
//!
//! Pipeline per marker and frame:
//! 1. Build a binary mask of the pixels inside the marker's HSV window.
//! 2. Open it (two erosions, two dilations, 5×5 elliptical element).
//! 3. Follow the outer boundary of every 8-connected region.
//! 4. Keep the boundary with the largest enclosed area.
//! 5. Fit the minimum enclosing circle; its center is the marker position.
//!
//! A frame without any region keeps the previous position as a `Stale`
//! reading. The angle between the two marker centers becomes the
//! horizontal control value.
//!
//! ```
//! use fruit_catcher_core::{Hsv, HsvImage};
//! use fruit_catcher_vision::{ColorCalibrator, MarkerTracker, TrackReading};
//!
//! let frame = HsvImage::filled(64, 48, Hsv::new(0, 0, 30));
//! let mut calibrator = ColorCalibrator::default();
//! calibrator.capture(Hsv::new(110, 200, 200));
//!
//! let tracker = MarkerTracker::default();
//! let window = calibrator.window(0).expect("marker 0 calibrated");
//! let reading = tracker.track(&frame.view(), window, &TrackReading::default());
//! assert!(!reading.is_found());
//! ```

pub mod calibrate;
pub mod circle;
pub mod contour;
pub mod orientation;
pub mod segment;
mod tracker;

pub use calibrate::{
    CalibrationMargins, CaptureOutcome, ColorCalibrator, ColorWindow, HUE_SNAP_THRESHOLD,
    MARKER_COUNT,
};
pub use circle::{min_enclosing_circle, EnclosingCircle};
pub use contour::{find_external_contours, largest_contour, Contour};
pub use orientation::{estimate, normalized_position, Orientation};
pub use segment::{dilate, erode, open, segment, StructuringElement};
pub use tracker::{MarkerTracker, ReadingSource, TrackReading, TrackerParams};
