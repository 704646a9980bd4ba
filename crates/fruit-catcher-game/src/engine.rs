//! Round state machine.
//!
//! ```text
//! Setup --calibration complete--> Start --start--> Playing --time up--> End
//!                                   ^                                  |
//!                                   +--------------replay--------------+
//! ```
//!
//! Every other command/state pair leaves the engine untouched.

use std::fmt;
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::fruit::{FallingEntity, FruitBatch};
use crate::geom::Aabb;
use crate::input::Key;
use crate::params::GameParams;
use crate::rng::{GameRng, RandomSource};
use crate::timer::RoundTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    /// Waiting for both marker colors.
    #[default]
    Setup,
    Start,
    Playing,
    End,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameState::Setup => "setup",
            GameState::Start => "start",
            GameState::Playing => "playing",
            GameState::End => "end",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Replay,
}

/// A state change that actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GameState,
    pub to: GameState,
}

/// What a single [`GameEngine::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Fruit caught on this tick.
    pub caught: u32,
    pub transition: Option<Transition>,
}

pub struct GameEngine<R: RandomSource = GameRng> {
    params: GameParams,
    state: GameState,
    score: u32,
    timer: RoundTimer,
    remaining: f64,
    batch: FruitBatch,
    catcher: Aabb,
    rng: R,
    last_tick: Option<Duration>,
    rounds: u32,
}

impl GameEngine<GameRng> {
    /// Engine with a seeded default generator.
    pub fn seeded(params: GameParams, seed: u64) -> Self {
        Self::new(params, GameRng::new(seed))
    }
}

impl<R: RandomSource> GameEngine<R> {
    pub fn new(params: GameParams, rng: R) -> Self {
        let timer = RoundTimer::new(params.round_limit_secs);
        let catcher = Aabb::new(
            params.catcher_x(0.5),
            params.catcher_y(),
            params.catcher_size,
            params.catcher_size,
        );
        Self {
            remaining: params.round_limit_secs,
            params,
            state: GameState::Setup,
            score: 0,
            timer,
            batch: FruitBatch::new(),
            catcher,
            rng,
            last_tick: None,
            rounds: 0,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn params(&self) -> &GameParams {
        &self.params
    }

    /// Seconds left in the current or last round, as of the latest tick.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn catcher(&self) -> Aabb {
        self.catcher
    }

    pub fn batch(&self) -> &FruitBatch {
        &self.batch
    }

    /// Fruit that should be drawn this frame.
    pub fn visible_fruit(&self) -> impl Iterator<Item = &FallingEntity> + '_ {
        self.batch.visible()
    }

    /// Rounds started since the session began.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    fn enter(&mut self, to: GameState) -> Transition {
        let from = self.state;
        self.state = to;
        info!("game state {from} -> {to}");
        Transition { from, to }
    }

    /// Second marker calibrated. Only has an effect in `Setup`.
    pub fn calibration_complete(&mut self) -> Option<Transition> {
        match self.state {
            GameState::Setup => Some(self.enter(GameState::Start)),
            _ => None,
        }
    }

    pub fn command(&mut self, cmd: Command, now: Duration) -> Option<Transition> {
        match (self.state, cmd) {
            (GameState::Start, Command::Start) => {
                self.start_round(now);
                Some(self.enter(GameState::Playing))
            }
            (GameState::End, Command::Replay) => Some(self.enter(GameState::Start)),
            (state, cmd) => {
                debug!("ignoring {cmd:?} in {state}");
                None
            }
        }
    }

    /// Key binding: space starts a round in `Start` and asks for a replay in `End`.
    pub fn press_key(&mut self, key: Key, now: Duration) -> Option<Transition> {
        let cmd = match (key, self.state) {
            (Key::Space, GameState::Start) => Command::Start,
            (Key::Space, GameState::End) => Command::Replay,
            _ => return None,
        };
        self.command(cmd, now)
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, now), fields(round = self.rounds + 1))
    )]
    fn start_round(&mut self, now: Duration) {
        self.score = 0;
        self.batch.spawn(&self.params, &mut self.rng);
        self.timer.restart(now);
        self.remaining = self.timer.remaining(now);
        self.last_tick = Some(now);
        self.rounds += 1;
        info!(
            "round {} started: {} fruit, {:.0}s",
            self.rounds,
            self.batch.len(),
            self.params.round_limit_secs
        );
    }

    /// Step the round. Only `Playing` does anything beyond recording the tick
    /// time; `normalized_pos` places the catcher.
    pub fn tick(&mut self, now: Duration, normalized_pos: f32) -> TickOutcome {
        let dt = self
            .last_tick
            .map_or(Duration::ZERO, |prev| now.saturating_sub(prev));
        self.last_tick = Some(now);

        if self.state != GameState::Playing {
            return TickOutcome::default();
        }

        self.remaining = self.timer.remaining(now);
        self.catcher = Aabb::new(
            self.params.catcher_x(normalized_pos),
            self.params.catcher_y(),
            self.params.catcher_size,
            self.params.catcher_size,
        );
        self.batch.advance(dt.as_secs_f32());
        let caught = self.batch.collide(&self.catcher);
        self.score += caught;
        if caught > 0 {
            debug!("caught {caught}, score {}", self.score);
        }

        let transition = if self.timer.expired(now) {
            let t = self.enter(GameState::End);
            info!("round {} over, score {}", self.rounds, self.score);
            Some(t)
        } else {
            None
        };
        TickOutcome { caught, transition }
    }

    /// Overlay text for the current state.
    pub fn hud(&self) -> String {
        match self.state {
            GameState::Setup => concat!(
                "Fruit Catcher\n",
                "Click the two markers in the camera view,\n",
                "left marker first, then the right one."
            )
            .to_string(),
            GameState::Start => "Press space key to begin.".to_string(),
            GameState::Playing => format!("Time: {:.6} Score: {}", self.remaining, self.score),
            GameState::End => format!(
                "Game over! Your score is {}!\nPress space key to play again.",
                self.score
            ),
        }
    }
}
