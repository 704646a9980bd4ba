use serde::{Deserialize, Serialize};

/// Largest hue value of an 8-bit HSV pixel (hue is stored in half-degrees).
pub const HUE_MAX: u8 = 179;

/// 8-bit HSV pixel.
///
/// Hue lives in `[0, 179]` (degrees / 2), saturation and value in `[0, 255]`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    #[inline]
    pub fn channels(self) -> [u8; 3] {
        [self.h, self.s, self.v]
    }

    #[inline]
    pub fn from_channels(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl std::fmt::Display for Hsv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.h, self.s, self.v)
    }
}

/// Convert one 8-bit RGB pixel to 8-bit HSV.
#[inline]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let diff = v - min;

    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if v == rf {
        60.0 * (gf - bf) / diff
    } else if v == gf {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    // 360 degrees wraps back onto 0 after halving and rounding.
    let h = ((h * 0.5).round() as u16 % (HUE_MAX as u16 + 1)) as u8;
    Hsv::new(h, s.round() as u8, v as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_map_to_half_degree_hues() {
        assert_eq!(rgb_to_hsv(255, 0, 0), Hsv::new(0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), Hsv::new(60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), Hsv::new(120, 255, 255));
    }

    #[test]
    fn grays_have_zero_hue_and_saturation() {
        assert_eq!(rgb_to_hsv(0, 0, 0), Hsv::new(0, 0, 0));
        assert_eq!(rgb_to_hsv(128, 128, 128), Hsv::new(0, 0, 128));
        assert_eq!(rgb_to_hsv(255, 255, 255), Hsv::new(0, 0, 255));
    }

    #[test]
    fn hue_stays_within_range() {
        for r in (0..=255u16).step_by(17) {
            for g in (0..=255u16).step_by(17) {
                for b in (0..=255u16).step_by(17) {
                    let hsv = rgb_to_hsv(r as u8, g as u8, b as u8);
                    assert!(hsv.h <= HUE_MAX, "hue {} out of range", hsv.h);
                }
            }
        }
    }

    #[test]
    fn hsv_serializes_as_named_channels() {
        let json = serde_json::to_string(&Hsv::new(10, 20, 30)).expect("serialize");
        assert_eq!(json, r#"{"h":10,"s":20,"v":30}"#);
    }
}
