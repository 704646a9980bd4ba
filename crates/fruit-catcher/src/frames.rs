//! Camera input.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use fruit_catcher_core::{HsvImage, ImageError};
use image::{ImageReader, RgbImage};
use log::debug;

use crate::error::FrameSourceError;

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// A stream of camera frames. `Ok(None)` ends the session.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameSourceError>;
}

impl<F: FrameSource + ?Sized> FrameSource for &mut F {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameSourceError> {
        (**self).next_frame()
    }
}

/// Frames recorded as image files, played back in file-name order.
#[derive(Debug, Clone)]
pub struct ImageSequence {
    pending: VecDeque<PathBuf>,
}

impl ImageSequence {
    /// Collect every image file directly inside `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, FrameSourceError> {
        let dir = dir.as_ref();
        let unavailable = |source| FrameSourceError::Unavailable {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(unavailable)? {
            let path = entry.map_err(unavailable)?.path();
            if path.is_file() && is_frame_file(&path) {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(FrameSourceError::Empty {
                path: dir.to_path_buf(),
            });
        }
        paths.sort();
        debug!("{} frames in {}", paths.len(), dir.display());
        Ok(Self::from_paths(paths))
    }

    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            pending: paths.into_iter().collect(),
        }
    }

    /// Frames not yet delivered.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            FRAME_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameSourceError> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };
        let reader = ImageReader::open(&path).map_err(|source| FrameSourceError::Io {
            path: path.clone(),
            source,
        })?;
        let img = reader
            .decode()
            .map_err(|source| FrameSourceError::Decode { path, source })?;
        Ok(Some(img.to_rgb8()))
    }
}

/// Convert a camera frame into the HSV buffer the tracker works on.
pub fn hsv_from_rgb(img: &RgbImage) -> Result<HsvImage, ImageError> {
    HsvImage::from_rgb(img.width() as usize, img.height() as usize, img.as_raw())
}
