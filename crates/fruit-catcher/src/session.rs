//! Per-tick coordination of perception, input and game rules.

use std::time::Duration;

use fruit_catcher_core::{BinaryMask, HsvImage};
use fruit_catcher_game::{
    GameEngine, GameRng, GameState, InputEvent, RandomSource, TickOutcome, Transition,
};
use fruit_catcher_vision::{
    estimate, CaptureOutcome, ColorCalibrator, MarkerTracker, Orientation, TrackReading,
    MARKER_COUNT,
};
use image::RgbImage;
use log::{info, warn};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::present::Scene;

/// Everything that lives for the whole run: calibration, the latest marker
/// readings, the HSV frame of the current tick and the game engine.
pub struct Session<R: RandomSource = GameRng> {
    calibrator: ColorCalibrator,
    tracker: MarkerTracker,
    readings: [TrackReading; MARKER_COUNT],
    orientation: Orientation,
    frame: HsvImage,
    engine: GameEngine<R>,
    closed: bool,
}

impl<R: RandomSource> Session<R> {
    pub fn new(engine: GameEngine<R>) -> Self {
        Self::with_parts(ColorCalibrator::default(), MarkerTracker::default(), engine)
    }

    pub fn with_parts(
        calibrator: ColorCalibrator,
        tracker: MarkerTracker,
        engine: GameEngine<R>,
    ) -> Self {
        let readings = [TrackReading::default(); MARKER_COUNT];
        let orientation = estimate(readings[0].centroid, readings[1].centroid);
        Self {
            calibrator,
            tracker,
            readings,
            orientation,
            frame: HsvImage::default(),
            engine,
            closed: false,
        }
    }

    /// Make `frame` the buffer perception and click sampling use this tick.
    pub fn set_frame(&mut self, frame: HsvImage) {
        self.frame = frame;
    }

    /// Track every calibrated marker on the current frame and refresh the
    /// control value. Markers without a color window keep their reading.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn perceive(&mut self) {
        let view = self.frame.view();
        for (marker, reading) in self.readings.iter_mut().enumerate() {
            if let Some(window) = self.calibrator.window(marker) {
                *reading = self.tracker.track(&view, window, reading);
            }
        }
        self.orientation = estimate(self.readings[0].centroid, self.readings[1].centroid);
    }

    /// Apply one drained input event.
    pub fn handle_event(&mut self, event: InputEvent, now: Duration) -> Option<Transition> {
        match event {
            InputEvent::WindowClosed => {
                info!("window closed");
                self.closed = true;
                None
            }
            InputEvent::KeyPressed(key) => self.engine.press_key(key, now),
            InputEvent::PointerClick { x, y } => self.sample_click(x, y),
        }
    }

    fn sample_click(&mut self, x: i64, y: i64) -> Option<Transition> {
        let Some(color) = self.frame.get(x, y) else {
            warn!(
                "click at ({x}, {y}) is outside the {}x{} frame",
                self.frame.width, self.frame.height
            );
            return None;
        };
        match self.calibrator.capture(color) {
            CaptureOutcome::Completed { .. } => self.engine.calibration_complete(),
            CaptureOutcome::Assigned { .. } | CaptureOutcome::Ignored => None,
        }
    }

    /// Advance the game with the control value from this tick's perception.
    pub fn update(&mut self, now: Duration) -> TickOutcome {
        self.engine.tick(now, self.orientation.normalized_pos)
    }

    /// Run one tick in loop order: perception, the given events, game update.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, events), fields(state = %self.engine.state()))
    )]
    pub fn step(
        &mut self,
        frame: HsvImage,
        events: impl IntoIterator<Item = InputEvent>,
        now: Duration,
    ) -> StepOutcome {
        self.set_frame(frame);
        self.perceive();
        let mut transitions: Vec<Transition> = events
            .into_iter()
            .filter_map(|ev| self.handle_event(ev, now))
            .collect();
        if self.closed {
            return StepOutcome {
                caught: 0,
                transitions,
            };
        }
        let tick = self.update(now);
        transitions.extend(tick.transition);
        StepOutcome {
            caught: tick.caught,
            transitions,
        }
    }

    /// Denoised mask of a calibrated marker on the current frame.
    pub fn marker_mask(&self, marker: usize) -> Option<BinaryMask> {
        let window = self.calibrator.window(marker)?;
        Some(self.tracker.mask(&self.frame.view(), window))
    }

    pub fn scene<'a>(&'a self, tick: u64, camera: &'a RgbImage) -> Scene<'a> {
        Scene {
            tick,
            state: self.engine.state(),
            hud: self.engine.hud(),
            catcher: self.engine.catcher(),
            fruit: self.engine.visible_fruit().collect(),
            params: self.engine.params(),
            camera,
        }
    }

    pub fn readings(&self) -> &[TrackReading; MARKER_COUNT] {
        &self.readings
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn calibrator(&self) -> &ColorCalibrator {
        &self.calibrator
    }

    pub fn frame(&self) -> &HsvImage {
        &self.frame
    }

    pub fn engine(&self) -> &GameEngine<R> {
        &self.engine
    }

    pub fn state(&self) -> GameState {
        self.engine.state()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Result of [`Session::step`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub caught: u32,
    pub transitions: Vec<Transition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use fruit_catcher_core::Hsv;
    use fruit_catcher_game::{GameParams, Key};
    use fruit_catcher_vision::ReadingSource;

    const BACKGROUND: Hsv = Hsv::new(0, 0, 30);
    const RED: Hsv = Hsv::new(2, 220, 200);
    const BLUE: Hsv = Hsv::new(110, 220, 200);

    fn disc(img: &mut HsvImage, cx: i64, cy: i64, r: i64, color: Hsv) {
        for y in cy - r..=cy + r {
            for x in cx - r..=cx + r {
                if (x - cx).pow(2) + (y - cy).pow(2) <= r * r {
                    img.put(x, y, color);
                }
            }
        }
    }

    /// Two markers, marker 0 on the left, marker 1 `dy` pixels lower on the right.
    fn frame(dy: i64) -> HsvImage {
        let mut img = HsvImage::filled(160, 120, BACKGROUND);
        disc(&mut img, 40, 60, 8, RED);
        disc(&mut img, 120, 60 + dy, 8, BLUE);
        img
    }

    fn session() -> Session {
        Session::new(GameEngine::seeded(GameParams::default(), 1))
    }

    fn at(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn calibrate(s: &mut Session) -> StepOutcome {
        s.step(
            frame(0),
            [
                InputEvent::PointerClick { x: 40, y: 60 },
                InputEvent::PointerClick { x: 120, y: 60 },
            ],
            at(0),
        )
    }

    #[test]
    fn two_clicks_finish_setup() {
        let mut s = session();
        let out = calibrate(&mut s);
        assert_eq!(
            out.transitions,
            vec![Transition {
                from: GameState::Setup,
                to: GameState::Start
            }]
        );
        assert_eq!(s.calibrator().window(0).map(|w| w.contains(RED)), Some(true));
        assert_eq!(s.calibrator().window(1).map(|w| w.contains(BLUE)), Some(true));
    }

    #[test]
    fn third_click_changes_nothing() {
        let mut s = session();
        calibrate(&mut s);
        let before = *s.calibrator().windows();
        let out = s.step(frame(0), [InputEvent::PointerClick { x: 5, y: 5 }], at(10));
        assert!(out.transitions.is_empty());
        assert_eq!(*s.calibrator().windows(), before);
        assert_eq!(s.state(), GameState::Start);
    }

    #[test]
    fn click_outside_frame_is_ignored() {
        let mut s = session();
        let out = s.step(
            frame(0),
            [
                InputEvent::PointerClick { x: -1, y: 10 },
                InputEvent::PointerClick { x: 160, y: 10 },
            ],
            at(0),
        );
        assert!(out.transitions.is_empty());
        assert!(s.calibrator().window(0).is_none());
    }

    #[test]
    fn clicks_sample_the_frame_of_their_tick() {
        let mut s = session();
        // Marker 0 is only where the click lands in this tick's frame.
        let mut img = HsvImage::filled(160, 120, BACKGROUND);
        disc(&mut img, 20, 20, 6, RED);
        s.step(img, [InputEvent::PointerClick { x: 20, y: 20 }], at(0));
        assert_eq!(
            s.calibrator().window(0).map(|w| w.contains(RED)),
            Some(true)
        );
    }

    #[test]
    fn tracking_starts_after_calibration() {
        let mut s = session();
        s.step(frame(0), [], at(0));
        assert_eq!(s.readings()[0].source, ReadingSource::Stale);
        assert_abs_diff_eq!(s.orientation().normalized_pos, 0.5);

        calibrate(&mut s);
        s.step(frame(0), [], at(10));
        assert!(s.readings().iter().all(TrackReading::is_found));
        assert_abs_diff_eq!(s.readings()[0].centroid.x, 40.0, epsilon = 0.5);
        assert_abs_diff_eq!(s.readings()[1].centroid.x, 120.0, epsilon = 0.5);
    }

    #[test]
    fn tilt_moves_the_catcher() {
        let mut s = session();
        calibrate(&mut s);
        s.step(frame(0), [InputEvent::KeyPressed(Key::Space)], at(0));
        assert_eq!(s.state(), GameState::Playing);

        // Marker 1 lower than marker 0: positive angle, catcher to the left.
        s.step(frame(40), [], at(100));
        let pos = s.orientation().normalized_pos;
        assert!(pos < 0.5);
        assert_abs_diff_eq!(s.engine().catcher().min.x, pos * 960.0, epsilon = 1e-3);

        // Marker 1 higher: catcher to the right.
        s.step(frame(-40), [], at(200));
        assert!(s.orientation().normalized_pos > 0.5);
    }

    #[test]
    fn lost_marker_holds_position() {
        let mut s = session();
        calibrate(&mut s);
        s.step(frame(0), [], at(10));
        let seen = s.readings()[1];

        let mut only_red = HsvImage::filled(160, 120, BACKGROUND);
        disc(&mut only_red, 40, 60, 8, RED);
        s.step(only_red.clone(), [], at(20));
        s.step(only_red, [], at(30));

        let held = s.readings()[1];
        assert_eq!(held.source, ReadingSource::Stale);
        assert_eq!(held.stale_ticks, 2);
        assert_eq!(held.centroid, seen.centroid);
        assert!(s.readings()[0].is_found());
    }

    #[test]
    fn window_closed_skips_the_update() {
        let mut s = session();
        let out = s.step(frame(0), [InputEvent::WindowClosed], at(0));
        assert!(s.is_closed());
        assert_eq!(out, StepOutcome::default());
    }

    #[test]
    fn masks_exist_only_for_calibrated_markers() {
        let mut s = session();
        s.set_frame(frame(0));
        assert!(s.marker_mask(0).is_none());
        calibrate(&mut s);
        let mask = s.marker_mask(0).unwrap();
        assert!(mask.get(40, 60));
        assert!(!mask.get(120, 60));
    }
}
