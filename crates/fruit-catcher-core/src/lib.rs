//! Core types shared by the fruit-catcher perception and game crates.
//!
//! This crate is intentionally small. It knows about HSV pixels, HSV frames
//! and binary masks, and nothing about markers, contours or game rules.

mod color;
mod image;
mod logger;
mod mask;

pub use color::{rgb_to_hsv, Hsv, HUE_MAX};
pub use image::{HsvImage, HsvImageView, ImageError};
pub use mask::BinaryMask;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init, init_with_level, LogSettings, ModuleLevel};
