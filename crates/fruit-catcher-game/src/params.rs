use serde::{Deserialize, Serialize};

/// Fixed rule constants.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Window (qHD)
    pub const WINDOW_WIDTH: f32 = 960.0;
    pub const WINDOW_HEIGHT: f32 = 540.0;

    // Round
    pub const ROUND_LIMIT_SECS: f64 = 30.0;
    pub const FRUITS_NUM: usize = 50;

    // Fruit
    pub const FRUIT_SIZE: f32 = 60.0;
    pub const FRUIT_SPEED_MIN: u32 = 100;
    pub const FRUIT_SPEED_MAX: u32 = 300;
    pub const FRUIT_HEIGHT_MAX: u32 = 2000;

    // Catcher (basket)
    pub const CATCHER_SIZE: f32 = 100.0;
    pub const CATCHER_LIFT: f32 = 80.0;
}

/// Game rules for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameParams {
    pub window_width: f32,
    pub window_height: f32,
    /// Round length in seconds.
    pub round_limit_secs: f64,
    /// Fruits spawned per round.
    pub fruits_num: usize,
    pub fruit_size: f32,
    /// Fall speed range in px/s, inclusive.
    pub fruit_speed_min: u32,
    pub fruit_speed_max: u32,
    /// Fruits start between 1 and this many pixels above the window.
    pub fruit_height_max: u32,
    pub catcher_size: f32,
    /// Distance from the catcher's top edge to the bottom of the window.
    pub catcher_lift: f32,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            window_width: Params::WINDOW_WIDTH,
            window_height: Params::WINDOW_HEIGHT,
            round_limit_secs: Params::ROUND_LIMIT_SECS,
            fruits_num: Params::FRUITS_NUM,
            fruit_size: Params::FRUIT_SIZE,
            fruit_speed_min: Params::FRUIT_SPEED_MIN,
            fruit_speed_max: Params::FRUIT_SPEED_MAX,
            fruit_height_max: Params::FRUIT_HEIGHT_MAX,
            catcher_size: Params::CATCHER_SIZE,
            catcher_lift: Params::CATCHER_LIFT,
        }
    }
}

impl GameParams {
    /// Top edge of the catcher box.
    pub fn catcher_y(&self) -> f32 {
        self.window_height - self.catcher_lift
    }

    /// Left edge of the catcher box for a control value.
    pub fn catcher_x(&self, normalized_pos: f32) -> f32 {
        normalized_pos * self.window_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_rule_constants() {
        let p = GameParams::default();
        assert_eq!(p.round_limit_secs, 30.0);
        assert_eq!(p.fruits_num, 50);
        assert_eq!((p.fruit_speed_min, p.fruit_speed_max), (100, 300));
        assert_eq!(p.fruit_height_max, 2000);
        assert_eq!((p.window_width, p.window_height), (960.0, 540.0));
    }

    #[test]
    fn catcher_anchor() {
        let p = GameParams::default();
        assert_eq!(p.catcher_y(), 460.0);
        assert_eq!(p.catcher_x(0.5), 480.0);
        assert_eq!(p.catcher_x(-0.25), -240.0);
    }
}
