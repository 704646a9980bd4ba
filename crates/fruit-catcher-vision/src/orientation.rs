//! Tilt between the two markers and the control value derived from it.

use std::f32::consts::FRAC_PI_2;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// Signed angle of the marker-0 → marker-1 segment, in `(-π, π]`.
    pub angle: f32,
    /// Horizontal control value; `[0, 1]` for `|angle| <= π/2`.
    pub normalized_pos: f32,
}

/// Angle from `c0` to `c1` and the corresponding control value.
pub fn estimate(c0: Point2<f32>, c1: Point2<f32>) -> Orientation {
    let angle = (c1.y - c0.y).atan2(c1.x - c0.x);
    Orientation {
        angle,
        normalized_pos: normalized_position(angle),
    }
}

/// Map an angle linearly onto the horizontal axis: `-π/2 → 1`, `0 → 0.5`,
/// `π/2 → 0`.
///
/// The result is not clamped; angles beyond a quarter turn leave `[0, 1]`.
pub fn normalized_position(angle: f32) -> f32 {
    if angle < 0.0 {
        0.5 + 0.5 * (-angle / FRAC_PI_2)
    } else {
        0.5 - 0.5 * (angle / FRAC_PI_2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn level_markers_center_the_catcher() {
        let o = estimate(Point2::new(10.0, 50.0), Point2::new(90.0, 50.0));
        assert_eq!(o.angle, 0.0);
        assert_eq!(o.normalized_pos, 0.5);
    }

    #[test]
    fn quarter_turns_hit_the_edges() {
        assert_abs_diff_eq!(normalized_position(FRAC_PI_2), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(normalized_position(-FRAC_PI_2), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn mapping_is_antisymmetric() {
        for k in -20..=20 {
            let theta = k as f32 / 20.0 * FRAC_PI_2;
            assert_abs_diff_eq!(
                normalized_position(-theta),
                1.0 - normalized_position(theta),
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn beyond_a_quarter_turn_is_not_clamped() {
        assert!(normalized_position(FRAC_PI_2 + 0.01) < 0.0);
        assert!(normalized_position(-FRAC_PI_2 - 0.01) > 1.0);
        assert_abs_diff_eq!(
            normalized_position(std::f32::consts::PI),
            -0.5,
            epsilon = 1e-6
        );
    }

    #[test]
    fn screen_down_tilt_moves_left() {
        // Marker 1 lower on screen (larger y) than marker 0.
        let o = estimate(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        assert_abs_diff_eq!(o.angle, std::f32::consts::FRAC_PI_4, epsilon = 1e-6);
        assert_abs_diff_eq!(o.normalized_pos, 0.25, epsilon = 1e-6);
    }
}
