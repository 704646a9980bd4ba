#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage, Rgba, RgbaImage};

pub const WIDTH: u32 = 64;
pub const HEIGHT: u32 = 48;
pub const RED_AT: (i64, i64) = (16, 24);
pub const BLUE_AT: (i64, i64) = (48, 24);

const BACKGROUND: Rgb<u8> = Rgb([25, 25, 25]);
const RED: Rgb<u8> = Rgb([220, 30, 30]);
const BLUE: Rgb<u8> = Rgb([30, 30, 220]);

fn disc(img: &mut RgbImage, (cx, cy): (i64, i64), r: i64, color: Rgb<u8>) {
    for y in cy - r..=cy + r {
        for x in cx - r..=cx + r {
            let inside = (x - cx).pow(2) + (y - cy).pow(2) <= r * r;
            if inside && x >= 0 && y >= 0 && x < WIDTH as i64 && y < HEIGHT as i64 {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Camera frame with a red marker on the left and a blue one on the right.
pub fn marker_frame() -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    disc(&mut img, RED_AT, 6, RED);
    disc(&mut img, BLUE_AT, 6, BLUE);
    img
}

pub fn write_frames(dir: &Path, count: usize) {
    let frame = marker_frame();
    for i in 0..count {
        frame.save(dir.join(format!("frame_{i:04}.png"))).unwrap();
    }
}

/// Clicks both markers on tick 0 and presses space on tick 1.
pub fn write_start_script(path: &Path, extra: &str) {
    let script = format!(
        r#"[
            {{"tick": 0, "event": {{"pointer_click": {{"x": {}, "y": {}}}}}}},
            {{"tick": 0, "event": {{"pointer_click": {{"x": {}, "y": {}}}}}}},
            {{"tick": 1, "event": {{"key_pressed": "space"}}}}{extra}
        ]"#,
        RED_AT.0, RED_AT.1, BLUE_AT.0, BLUE_AT.1
    );
    fs::write(path, script).unwrap();
}

pub const TEST_FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/DejaVuSansMono.ttf");

pub fn write_assets(dir: &Path) {
    fs::copy(TEST_FONT, dir.join("font.ttf")).unwrap();
    RgbImage::from_pixel(16, 9, Rgb([40, 120, 40]))
        .save(dir.join("background.jpg"))
        .unwrap();
    RgbaImage::from_pixel(10, 10, Rgba([150, 100, 50, 255]))
        .save(dir.join("basket.png"))
        .unwrap();
    for name in [
        "apple.png",
        "orange.png",
        "banana.png",
        "blueberry.png",
        "strawberry.png",
        "peach.png",
        "cherry.png",
    ] {
        RgbaImage::from_pixel(6, 6, Rgba([200, 20, 20, 255]))
            .save(dir.join(name))
            .unwrap();
    }
    RgbImage::from_pixel(6, 6, Rgb([90, 20, 120]))
        .save(dir.join("grape.jpg"))
        .unwrap();
}
