//! The session loop.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use fruit_catcher_game::{EventQueue, GameState, RandomSource};
use fruit_catcher_vision::{ColorWindow, TrackReading, MARKER_COUNT};
use log::{debug, info};
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::{PresentError, RunError};
use crate::frames::{hsv_from_rgb, FrameSource};
use crate::present::{annotate_frame, write_mask, Presenter};
use crate::script::EventSource;
use crate::session::Session;

/// Session time source.
#[derive(Debug, Clone, Copy)]
pub enum LoopClock {
    /// Real time since the loop started.
    Wall(Instant),
    /// `tick * step`, for replaying recorded frames at a fixed rate.
    Fixed(Duration),
}

impl LoopClock {
    pub fn new(frame_interval: Option<Duration>) -> Self {
        match frame_interval {
            Some(step) => LoopClock::Fixed(step),
            None => LoopClock::Wall(Instant::now()),
        }
    }

    pub fn now(&self, tick: u64) -> Duration {
        match self {
            LoopClock::Wall(start) => start.elapsed(),
            LoopClock::Fixed(step) => {
                let nanos = step.as_nanos().saturating_mul(u128::from(tick));
                Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
            }
        }
    }
}

/// Ticks per second, measured over one-second windows of session time.
#[derive(Debug, Clone, Default)]
pub struct FpsMeter {
    window_start: Option<Duration>,
    frames: u32,
    last: Option<f64>,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a tick at `now`; returns the rate when a window closes.
    pub fn record(&mut self, now: Duration) -> Option<f64> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        let elapsed = now.saturating_sub(start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = f64::from(self.frames) / elapsed.as_secs_f64();
        self.window_start = Some(now);
        self.frames = 0;
        self.last = Some(fps);
        Some(fps)
    }

    /// Rate of the most recent complete window.
    pub fn last(&self) -> Option<f64> {
        self.last
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Fixed tick length; wall clock when unset.
    pub frame_interval: Option<Duration>,
    /// Directory for per-tick marker masks.
    pub dump_masks: Option<PathBuf>,
}

/// Summary printed when the loop ends.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub state: GameState,
    pub score: u32,
    pub ticks: u64,
    pub rounds: u32,
    pub closed: bool,
    pub fps: Option<f64>,
    pub windows: [Option<ColorWindow>; MARKER_COUNT],
    pub readings: [TrackReading; MARKER_COUNT],
}

impl RunReport {
    fn new<R: RandomSource>(session: &Session<R>, ticks: u64, fps: Option<f64>) -> Self {
        Self {
            state: session.state(),
            score: session.engine().score(),
            ticks,
            rounds: session.engine().rounds(),
            closed: session.is_closed(),
            fps,
            windows: *session.calibrator().windows(),
            readings: *session.readings(),
        }
    }
}

/// Drive `session` until the frames run out or the window is closed.
///
/// Each tick acquires and converts a frame, runs [`Session::step`], then
/// dumps masks and presents.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(session, frames, events, presenter, opts))
)]
pub fn run<R, F, E, P>(
    session: &mut Session<R>,
    frames: &mut F,
    events: &mut E,
    presenter: &mut P,
    opts: &RunOptions,
) -> Result<RunReport, RunError>
where
    R: RandomSource,
    F: FrameSource + ?Sized,
    E: EventSource + ?Sized,
    P: Presenter + ?Sized,
{
    if let Some(dir) = &opts.dump_masks {
        fs::create_dir_all(dir).map_err(PresentError::from)?;
    }

    let clock = LoopClock::new(opts.frame_interval);
    let mut fps = FpsMeter::new();
    let mut queue = EventQueue::new();
    let mut tick: u64 = 0;

    while let Some(rgb) = frames.next_frame()? {
        let now = clock.now(tick);
        events.poll(tick, &mut queue);
        let outcome = session.step(hsv_from_rgb(&rgb)?, queue.drain(), now);
        if session.is_closed() {
            break;
        }
        if outcome.caught > 0 {
            debug!("tick {tick}: caught {}", outcome.caught);
        }

        if let Some(dir) = &opts.dump_masks {
            for marker in 0..MARKER_COUNT {
                if let Some(mask) = session.marker_mask(marker) {
                    write_mask(&mask, &dir.join(format!("mask{marker}_{tick:05}.png")))?;
                }
            }
        }

        let camera = annotate_frame(&rgb, session.readings(), session.calibrator());
        presenter.present(&session.scene(tick, &camera))?;

        if let Some(rate) = fps.record(now) {
            debug!("{rate:.1} fps");
        }
        tick += 1;
    }

    let report = RunReport::new(session, tick, fps.last());
    info!(
        "session over after {} ticks: {} with score {}",
        report.ticks, report.state, report.score
    );
    Ok(report)
}
