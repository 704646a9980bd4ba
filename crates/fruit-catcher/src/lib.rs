//! Facade crate for the `fruit-catcher-*` workspace.
//!
//! This crate provides:
//! - re-exports of the perception (`vision`), rules (`game`) and pixel
//!   (`core`) crates
//! - the [`Session`] object that runs one tick of perception, input and game
//!   update
//! - file-backed collaborators: an image-sequence camera, scripted input,
//!   an asset store and presenters that log or render PNG frames
//! - [`run`], the session loop used by the `fruit-catcher` binary
//!
//! ## Quickstart
//!
//! ```no_run
//! use fruit_catcher::{
//!     run, GameEngine, GameParams, ImageSequence, LogPresenter, RunOptions, ScriptedInput,
//!     Session,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new(GameEngine::seeded(GameParams::default(), 42));
//! let mut frames = ImageSequence::open("recording/")?;
//! let mut input = ScriptedInput::load_json("recording/input.json")?;
//! let mut presenter = LogPresenter::default();
//!
//! let report = run(&mut session, &mut frames, &mut input, &mut presenter, &RunOptions::default())?;
//! println!("score: {}", report.score);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `fruit_catcher::core`: HSV pixels and frames, binary masks, logger setup.
//! - `fruit_catcher::vision`: calibration, segmentation, contours, tracking, tilt.
//! - `fruit_catcher::game`: engine state machine, falling fruit, input events.

pub use fruit_catcher_core as core;
pub use fruit_catcher_game as game;
pub use fruit_catcher_vision as vision;

pub use fruit_catcher_core::{Hsv, HsvImage};
pub use fruit_catcher_game::{
    GameEngine, GameParams, GameRng, GameState, InputEvent, Key, RandomSource,
};
pub use fruit_catcher_vision::{ColorCalibrator, MarkerTracker, TrackReading};

mod assets;
mod error;
mod frames;
mod present;
mod run;
mod script;
mod session;

pub use assets::{AssetStore, BACKGROUND_FILE, BASKET_FILE, FONT_FILE};
pub use error::{AssetError, FrameSourceError, PresentError, RunError, ScriptError};
pub use frames::{hsv_from_rgb, FrameSource, ImageSequence};
pub use present::{
    annotate_frame, write_mask, CanvasPresenter, LogPresenter, Presenter, Scene,
    INDICATOR_THICKNESS, MARKER_COLORS,
};
pub use run::{run, FpsMeter, LoopClock, RunOptions, RunReport};
pub use script::{EventSource, ScriptEntry, ScriptedInput};
pub use session::{Session, StepOutcome};
