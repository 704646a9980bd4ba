use crate::color::{rgb_to_hsv, Hsv};

/// Errors produced when building an HSV frame from a raw buffer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid RGB buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
}

#[derive(Clone, Copy, Debug)]
pub struct HsvImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [Hsv], // row-major, len = w*h
}

impl HsvImageView<'_> {
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<Hsv> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.data[y as usize * self.width + x as usize])
    }
}

/// Owned HSV frame. This is the buffer the tracker segments and the
/// calibrator samples from.
#[derive(Clone, Debug, Default)]
pub struct HsvImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<Hsv>,
}

impl HsvImage {
    /// Convert an interleaved 8-bit RGB buffer.
    pub fn from_rgb(width: usize, height: usize, rgb: &[u8]) -> Result<Self, ImageError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or(ImageError::InvalidDimensions { width, height })?;
        if rgb.len() != expected {
            return Err(ImageError::InvalidBuffer {
                expected,
                got: rgb.len(),
            });
        }
        let data = rgb
            .chunks_exact(3)
            .map(|px| rgb_to_hsv(px[0], px[1], px[2]))
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Uniformly colored frame, mostly useful for synthetic inputs.
    pub fn filled(width: usize, height: usize, color: Hsv) -> Self {
        Self {
            width,
            height,
            data: vec![color; width * height],
        }
    }

    pub fn view(&self) -> HsvImageView<'_> {
        HsvImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<Hsv> {
        self.view().get(x, y)
    }

    /// Overwrite one pixel; out-of-bounds writes are ignored.
    #[inline]
    pub fn put(&mut self, x: i64, y: i64, color: Hsv) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.data[y as usize * self.width + x as usize] = color;
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
