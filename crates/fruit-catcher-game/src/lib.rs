//! Game rules for fruit-catcher: the round state machine, the falling-fruit
//! simulation and the input events that drive them.
//!
//! The engine never looks at camera frames. It is fed a control value in
//! `[0, 1]` (values outside are allowed and push the catcher off-screen) and a
//! session clock.
//!
//! ```
//! use std::time::Duration;
//! use fruit_catcher_game::{GameEngine, GameParams, GameState, Key};
//!
//! let mut engine = GameEngine::seeded(GameParams::default(), 7);
//! engine.calibration_complete();
//! engine.press_key(Key::Space, Duration::ZERO);
//! assert_eq!(engine.state(), GameState::Playing);
//!
//! engine.tick(Duration::from_secs(31), 0.5);
//! assert_eq!(engine.state(), GameState::End);
//! ```

mod engine;
mod fruit;
mod geom;
mod input;
mod params;
mod rng;
mod timer;

pub use engine::{Command, GameEngine, GameState, TickOutcome, Transition};
pub use fruit::{FallingEntity, FruitBatch, SpriteClass};
pub use geom::Aabb;
pub use input::{EventQueue, InputEvent, Key};
pub use params::{GameParams, Params};
pub use rng::{GameRng, RandomSource};
pub use timer::RoundTimer;
