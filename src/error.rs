use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification used by the dispatcher to branch on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The font program could not be opened or parsed.
    FontLoad,
    /// Anything that went wrong after the font was loaded.
    Render,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to load font from {}: {reason}", path.display())]
    FontLoad { path: PathBuf, reason: String },
    #[error("Canvas {width}x{height} exceeds the limit of {max_pixels} pixels")]
    CanvasTooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl RenderError {
    pub fn font_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FontLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::FontLoad { .. } => ErrorKind::FontLoad,
            RenderError::CanvasTooLarge { .. } | RenderError::Io(_) | RenderError::Image(_) => {
                ErrorKind::Render
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
