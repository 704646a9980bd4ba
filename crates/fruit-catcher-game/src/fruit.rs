//! Falling fruit: spawning, motion and catch detection.

use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::geom::Aabb;
use crate::params::GameParams;
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteClass {
    Apple,
    Orange,
    Banana,
    Blueberry,
    Strawberry,
    Peach,
    Cherry,
    Grape,
}

impl SpriteClass {
    pub const ALL: [SpriteClass; 8] = [
        SpriteClass::Apple,
        SpriteClass::Orange,
        SpriteClass::Banana,
        SpriteClass::Blueberry,
        SpriteClass::Strawberry,
        SpriteClass::Peach,
        SpriteClass::Cherry,
        SpriteClass::Grape,
    ];

    /// Image file name of the sprite inside the asset directory.
    pub fn asset_file(self) -> &'static str {
        match self {
            SpriteClass::Apple => "apple.png",
            SpriteClass::Orange => "orange.png",
            SpriteClass::Banana => "banana.png",
            SpriteClass::Blueberry => "blueberry.png",
            SpriteClass::Strawberry => "strawberry.png",
            SpriteClass::Peach => "peach.png",
            SpriteClass::Cherry => "cherry.png",
            SpriteClass::Grape => "grape.jpg",
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One fruit of the current round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FallingEntity {
    /// Top-left corner, window pixels.
    pub position: Point2<f32>,
    pub size: f32,
    /// px/s
    pub fall_speed: f32,
    pub sprite: SpriteClass,
    pub caught: bool,
}

impl FallingEntity {
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position.x, self.position.y, self.size, self.size)
    }
}

/// The fixed-size set of fruit for one round.
///
/// Fruit is never removed mid-round; caught fruit stays in the batch with its
/// flag set and is skipped by [`FruitBatch::visible`].
#[derive(Clone, Debug, Default)]
pub struct FruitBatch {
    entities: Vec<FallingEntity>,
}

impl FruitBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the batch with `params.fruits_num` fresh fruit above the window.
    ///
    /// Draw order per fruit: sprite, speed, x, height above the top edge.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, params, rng), fields(n = params.fruits_num))
    )]
    pub fn spawn<R: RandomSource + ?Sized>(&mut self, params: &GameParams, rng: &mut R) {
        self.entities.clear();
        self.entities.reserve(params.fruits_num);
        let last_sprite = (SpriteClass::ALL.len() - 1) as u32;
        for _ in 0..params.fruits_num {
            let sprite = SpriteClass::ALL[rng.uniform(0, last_sprite) as usize];
            let speed = rng.uniform(params.fruit_speed_min, params.fruit_speed_max);
            let x = rng.uniform(0, params.window_width.max(0.0) as u32);
            let above = rng.uniform(1, params.fruit_height_max.max(1));
            self.entities.push(FallingEntity {
                position: Point2::new(x as f32, -(above as f32)),
                size: params.fruit_size,
                fall_speed: speed as f32,
                sprite,
                caught: false,
            });
        }
        debug!("spawned {} fruits", self.entities.len());
    }

    /// Move every fruit down by `fall_speed * dt` (`dt` in seconds).
    pub fn advance(&mut self, dt: f32) {
        for e in &mut self.entities {
            e.position.y += e.fall_speed * dt;
        }
    }

    /// Mark uncaught fruit overlapping `catcher` as caught and return how many
    /// were caught by this call.
    pub fn collide(&mut self, catcher: &Aabb) -> u32 {
        let mut caught = 0;
        for e in &mut self.entities {
            if !e.caught && e.bounds().intersects(catcher) {
                e.caught = true;
                caught += 1;
            }
        }
        caught
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Fruit still to be drawn.
    pub fn visible(&self) -> impl Iterator<Item = &FallingEntity> + '_ {
        self.entities.iter().filter(|e| !e.caught)
    }

    pub fn entities(&self) -> &[FallingEntity] {
        &self.entities
    }

    pub fn caught_count(&self) -> usize {
        self.entities.iter().filter(|e| e.caught).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_entities(entities: Vec<FallingEntity>) -> Self {
        Self { entities }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::GameRng;
    use approx::assert_abs_diff_eq;

    fn fruit(x: f32, y: f32, speed: f32) -> FallingEntity {
        FallingEntity {
            position: Point2::new(x, y),
            size: 60.0,
            fall_speed: speed,
            sprite: SpriteClass::Apple,
            caught: false,
        }
    }

    #[test]
    fn spawn_respects_ranges() {
        let params = GameParams::default();
        let mut rng = GameRng::new(3);
        let mut batch = FruitBatch::new();
        batch.spawn(&params, &mut rng);

        assert_eq!(batch.len(), 50);
        for e in batch.entities() {
            assert!((0.0..=960.0).contains(&e.position.x));
            assert!((-2000.0..=-1.0).contains(&e.position.y));
            assert!((100.0..=300.0).contains(&e.fall_speed));
            assert_eq!(e.size, 60.0);
            assert!(!e.caught);
        }
    }

    #[test]
    fn respawn_replaces_previous_batch() {
        let params = GameParams {
            fruits_num: 5,
            ..GameParams::default()
        };
        let mut rng = GameRng::new(3);
        let mut batch = FruitBatch::new();
        batch.spawn(&params, &mut rng);
        let first = batch.entities().to_vec();
        batch.spawn(&params, &mut rng);
        assert_eq!(batch.len(), 5);
        assert_ne!(batch.entities(), first.as_slice());
    }

    #[test]
    fn advance_is_speed_times_dt() {
        let mut batch = FruitBatch::from_entities(vec![fruit(0.0, -100.0, 200.0)]);
        batch.advance(0.25);
        assert_abs_diff_eq!(batch.entities()[0].position.y, -50.0);
        batch.advance(0.0);
        assert_abs_diff_eq!(batch.entities()[0].position.y, -50.0);
    }

    #[test]
    fn overlap_scores_once_per_fruit() {
        let catcher = Aabb::new(100.0, 460.0, 100.0, 100.0);
        let mut batch = FruitBatch::from_entities(vec![
            fruit(120.0, 420.0, 100.0),
            fruit(500.0, 420.0, 100.0),
        ]);

        assert_eq!(batch.collide(&catcher), 1);
        // Still overlapping on the following ticks.
        batch.advance(0.1);
        assert_eq!(batch.collide(&catcher), 0);
        batch.advance(0.1);
        assert_eq!(batch.collide(&catcher), 0);

        assert_eq!(batch.caught_count(), 1);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.visible().count(), 1);
    }

    #[test]
    fn sprite_files_are_distinct() {
        let mut files: Vec<_> = SpriteClass::ALL.iter().map(|s| s.asset_file()).collect();
        files.sort_unstable();
        files.dedup();
        assert_eq!(files.len(), SpriteClass::ALL.len());
        assert_eq!(SpriteClass::Grape.index(), 7);
    }
}
