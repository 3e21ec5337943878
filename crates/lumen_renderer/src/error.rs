//! Error types for the render engine.

use std::path::PathBuf;
use thiserror::Error;

/// Recoverable failures outside the render loop.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid renderer configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("white point must be positive and finite, got {0}")]
    InvalidWhitePoint(f32),

    #[error("no frame has been rendered yet")]
    NoFrame,
}

/// Why a submission was ignored. Job state is untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a render is already in progress")]
    Busy,

    #[error("degenerate resolution {width}x{height}")]
    DegenerateResolution { width: u32, height: u32 },

    #[error("white point must be positive and finite")]
    InvalidWhitePoint,
}

pub type Result<T> = std::result::Result<T, RenderError>;
