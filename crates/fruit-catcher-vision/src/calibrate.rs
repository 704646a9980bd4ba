//! Click-to-calibrate color windows for the two markers.

use fruit_catcher_core::Hsv;
use log::info;
use serde::{Deserialize, Serialize};

/// Number of tracked markers.
pub const MARKER_COUNT: usize = 2;

/// Upper hue bound above which the window snaps to 255 instead of clamping.
pub const HUE_SNAP_THRESHOLD: u16 = 150;

/// Per-channel half-widths applied around a sampled color.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CalibrationMargins {
    pub hue: u8,
    pub saturation: u8,
    pub value: u8,
}

impl Default for CalibrationMargins {
    fn default() -> Self {
        Self {
            hue: 8,
            saturation: 80,
            value: 80,
        }
    }
}

/// Inclusive HSV range used to segment one marker.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ColorWindow {
    pub low: Hsv,
    pub high: Hsv,
}

impl ColorWindow {
    pub fn new(low: Hsv, high: Hsv) -> Self {
        Self { low, high }
    }

    /// Derive a window around `sample`.
    ///
    /// Lows clamp at 0 and saturation/value highs at 255. The hue high is
    /// `sample.h + margin` unless that exceeds [`HUE_SNAP_THRESHOLD`], in
    /// which case it becomes 255 and the window reaches every hue above the low.
    pub fn from_sample(sample: Hsv, margins: &CalibrationMargins) -> Self {
        let low = Hsv::new(
            sample.h.saturating_sub(margins.hue),
            sample.s.saturating_sub(margins.saturation),
            sample.v.saturating_sub(margins.value),
        );

        let hue_high = sample.h as u16 + margins.hue as u16;
        let high = Hsv::new(
            if hue_high > HUE_SNAP_THRESHOLD {
                u8::MAX
            } else {
                hue_high as u8
            },
            sample.s.saturating_add(margins.saturation),
            sample.v.saturating_add(margins.value),
        );

        Self { low, high }
    }

    #[inline]
    pub fn contains(&self, px: Hsv) -> bool {
        (self.low.h..=self.high.h).contains(&px.h)
            && (self.low.s..=self.high.s).contains(&px.s)
            && (self.low.v..=self.high.v).contains(&px.v)
    }
}

/// What a single `capture` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A marker window was set; more markers are still missing.
    Assigned { marker: usize, window: ColorWindow },
    /// The last missing window was set.
    Completed { marker: usize, window: ColorWindow },
    /// Both windows were already set; nothing changed.
    Ignored,
}

impl CaptureOutcome {
    pub fn completes_calibration(&self) -> bool {
        matches!(self, CaptureOutcome::Completed { .. })
    }
}

/// Assigns marker windows in click order: first marker 0, then marker 1.
#[derive(Clone, Debug, Default)]
pub struct ColorCalibrator {
    margins: CalibrationMargins,
    windows: [Option<ColorWindow>; MARKER_COUNT],
}

impl ColorCalibrator {
    pub fn new(margins: CalibrationMargins) -> Self {
        Self {
            margins,
            windows: [None; MARKER_COUNT],
        }
    }

    pub fn margins(&self) -> &CalibrationMargins {
        &self.margins
    }

    pub fn capture(&mut self, sample: Hsv) -> CaptureOutcome {
        let Some(marker) = self.windows.iter().position(Option::is_none) else {
            return CaptureOutcome::Ignored;
        };

        let window = ColorWindow::from_sample(sample, &self.margins);
        self.windows[marker] = Some(window);
        info!(
            "marker {marker} color: {sample} color_min: {} color_max: {}",
            window.low, window.high
        );

        if self.is_complete() {
            CaptureOutcome::Completed { marker, window }
        } else {
            CaptureOutcome::Assigned { marker, window }
        }
    }

    #[inline]
    pub fn window(&self, marker: usize) -> Option<&ColorWindow> {
        self.windows.get(marker).and_then(Option::as_ref)
    }

    pub fn windows(&self) -> &[Option<ColorWindow>; MARKER_COUNT] {
        &self.windows
    }

    pub fn is_complete(&self) -> bool {
        self.windows.iter().all(Option::is_some)
    }
}
