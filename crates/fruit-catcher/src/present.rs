//! Drawing the game window and the camera preview.
//!
//! There is no on-screen window here. [`LogPresenter`] reports the overlay
//! text through the logger, [`CanvasPresenter`] composites the game window,
//! overlay text included, into PNG files.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use fruit_catcher_core::BinaryMask;
use fruit_catcher_game::{Aabb, FallingEntity, GameParams, GameState, SpriteClass};
use fruit_catcher_vision::{ColorCalibrator, TrackReading, MARKER_COUNT};
use image::imageops::{self, FilterType};
use image::{ColorType, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use log::{debug, info};

use crate::assets::AssetStore;
use crate::error::PresentError;

/// Indicator colors, marker 0 first.
pub const MARKER_COLORS: [Rgb<u8>; MARKER_COUNT] = [Rgb([255, 0, 0]), Rgb([0, 255, 0])];
pub const INDICATOR_THICKNESS: u32 = 5;
/// Overlay text height in pixels.
pub const HUD_TEXT_SIZE: f32 = 30.0;
const HUD_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CLEAR_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// What is on screen after a tick.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub tick: u64,
    pub state: GameState,
    pub hud: String,
    pub catcher: Aabb,
    /// Uncaught fruit only.
    pub fruit: Vec<&'a FallingEntity>,
    pub params: &'a GameParams,
    /// Camera frame with marker indicators.
    pub camera: &'a RgbImage,
}

pub trait Presenter {
    fn present(&mut self, scene: &Scene<'_>) -> Result<(), PresentError>;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, scene: &Scene<'_>) -> Result<(), PresentError> {
        (**self).present(scene)
    }
}

impl<A: Presenter, B: Presenter> Presenter for (A, B) {
    fn present(&mut self, scene: &Scene<'_>) -> Result<(), PresentError> {
        self.0.present(scene)?;
        self.1.present(scene)
    }
}

/// Writes the overlay text to the log: `info` whenever the state changes,
/// `debug` on every other tick.
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_state: Option<GameState>,
}

impl Presenter for LogPresenter {
    fn present(&mut self, scene: &Scene<'_>) -> Result<(), PresentError> {
        let hud = scene.hud.replace('\n', " | ");
        if self.last_state != Some(scene.state) {
            info!("[{}] {hud}", scene.state);
            self.last_state = Some(scene.state);
        } else {
            debug!("[{}] tick {} {hud}", scene.state, scene.tick);
        }
        Ok(())
    }
}

/// Composites the game window into `game_<tick>.png` and, optionally, saves
/// the annotated camera frame as `camera_<tick>.png`.
///
/// While playing the window shows background, fruit, basket and overlay
/// text, in that order. Other states show the text on a cleared window.
pub struct CanvasPresenter {
    out_dir: PathBuf,
    background: RgbaImage,
    basket: RgbaImage,
    fruit: Vec<RgbaImage>,
    font: FontArc,
    save_camera: bool,
}

impl CanvasPresenter {
    /// Scale the assets once to window, catcher and fruit size.
    pub fn new(
        assets: &AssetStore,
        params: &GameParams,
        out_dir: impl Into<PathBuf>,
    ) -> Result<Self, PresentError> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)?;
        let (w, h) = (px(params.window_width), px(params.window_height));
        let catcher = px(params.catcher_size);
        let fruit = px(params.fruit_size);
        Ok(Self {
            out_dir,
            background: imageops::resize(&assets.background, w, h, FilterType::Triangle),
            basket: imageops::resize(&assets.basket, catcher, catcher, FilterType::Triangle),
            fruit: SpriteClass::ALL
                .iter()
                .map(|&c| imageops::resize(assets.sprite(c), fruit, fruit, FilterType::Triangle))
                .collect(),
            font: assets.font.clone(),
            save_camera: false,
        })
    }

    pub fn with_camera(mut self, save_camera: bool) -> Self {
        self.save_camera = save_camera;
        self
    }

    /// The game window for `scene`.
    pub fn render(&self, scene: &Scene<'_>) -> RgbaImage {
        let mut canvas = if scene.state == GameState::Playing {
            let mut canvas = self.background.clone();
            for f in &scene.fruit {
                imageops::overlay(
                    &mut canvas,
                    &self.fruit[f.sprite.index()],
                    f.position.x.round() as i64,
                    f.position.y.round() as i64,
                );
            }
            imageops::overlay(
                &mut canvas,
                &self.basket,
                scene.catcher.min.x.round() as i64,
                scene.catcher.min.y.round() as i64,
            );
            canvas
        } else {
            let (w, h) = self.background.dimensions();
            RgbaImage::from_pixel(w, h, CLEAR_COLOR)
        };
        draw_hud(&mut canvas, &self.font, &scene.hud);
        canvas
    }
}

/// Overlay text from the top-left corner, one row per line.
fn draw_hud(canvas: &mut RgbaImage, font: &FontArc, text: &str) {
    let scale = PxScale::from(HUD_TEXT_SIZE);
    let scaled = font.as_scaled(scale);
    let line_height = (scaled.height() + scaled.line_gap()).ceil() as i32;
    for (row, line) in text.lines().enumerate() {
        draw_text_mut(canvas, HUD_COLOR, 0, row as i32 * line_height, scale, font, line);
    }
}

impl Presenter for CanvasPresenter {
    fn present(&mut self, scene: &Scene<'_>) -> Result<(), PresentError> {
        let path = self.out_dir.join(format!("game_{:05}.png", scene.tick));
        self.render(scene).save(path)?;
        if self.save_camera {
            let path = self.out_dir.join(format!("camera_{:05}.png", scene.tick));
            scene.camera.save(path)?;
        }
        Ok(())
    }
}

fn px(v: f32) -> u32 {
    v.round().max(1.0) as u32
}

/// Copy of `frame` with a ring drawn around every calibrated marker found
/// on this frame. Stale readings get no ring.
pub fn annotate_frame(
    frame: &RgbImage,
    readings: &[TrackReading; MARKER_COUNT],
    calibrator: &ColorCalibrator,
) -> RgbImage {
    let mut out = frame.clone();
    for (marker, reading) in readings.iter().enumerate() {
        if calibrator.window(marker).is_none() || !reading.is_found() {
            continue;
        }
        draw_ring(
            &mut out,
            reading.centroid.x.round() as i64,
            reading.centroid.y.round() as i64,
            reading.radius.round() as i64,
            INDICATOR_THICKNESS,
            MARKER_COLORS[marker],
        );
    }
    out
}

/// Ring of the given stroke width centered on the circle outline.
fn draw_ring(img: &mut RgbImage, cx: i64, cy: i64, radius: i64, thickness: u32, color: Rgb<u8>) {
    let half = thickness as f64 / 2.0;
    let inner = (radius as f64 - half).max(0.0);
    let outer = radius as f64 + half;
    let reach = outer.ceil() as i64;
    let (w, h) = (img.width() as i64, img.height() as i64);

    for y in (cy - reach).max(0)..=(cy + reach).min(h - 1) {
        for x in (cx - reach).max(0)..=(cx + reach).min(w - 1) {
            let d = (((x - cx).pow(2) + (y - cy).pow(2)) as f64).sqrt();
            if d >= inner && d <= outer {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Save a mask as an 8-bit grayscale PNG.
pub fn write_mask(mask: &BinaryMask, path: &Path) -> Result<(), PresentError> {
    image::save_buffer(
        path,
        &mask.data,
        mask.width as u32,
        mask.height as u32,
        ColorType::L8,
    )?;
    Ok(())
}
