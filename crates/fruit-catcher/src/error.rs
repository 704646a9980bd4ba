use std::path::PathBuf;

/// Failure to load one of the game's image or font assets.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("asset not found: {path}")]
    Missing { path: PathBuf },

    #[error("failed to read asset {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode asset {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("invalid font {path}: {source}")]
    Font {
        path: PathBuf,
        source: ab_glyph::InvalidFont,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum FrameSourceError {
    #[error("cannot open frame directory {path}: {source}")]
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no image frames in {path}")]
    Empty { path: PathBuf },

    #[error("failed to read frame {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode frame {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors while writing rendered frames or debug masks.
#[derive(thiserror::Error, Debug)]
pub enum PresentError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Anything that stops the session loop early.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Frames(#[from] FrameSourceError),

    #[error(transparent)]
    Frame(#[from] fruit_catcher_core::ImageError),

    #[error(transparent)]
    Present(#[from] PresentError),
}
