//! Renders short text in a chosen font and color into a minimal PNG "tattoo".
//!
//! The core is [`TattooRenderer::render`]: load the font, measure the ink box
//! of the shaped text, pad it into a canvas, center the run and write a PNG
//! under a fresh unique name. Request validation, font lookup by name and
//! asynchronous dispatch with retries sit around it in [`request`], [`font`]
//! and [`tasks`].
//!
//! ```ignore
//! use tattoo_text::prelude::*;
//!
//! let renderer = TattooRenderer::new(RenderConfig::new().output_dir("media/tattoos"));
//! let artifact = renderer.render("Hi", "fonts/Lobster.ttf".as_ref(), Color::parse("#FF0000")?, 100)?;
//! println!("{} ({}x{})", artifact.path.display(), artifact.width, artifact.height);
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod renderer;
pub mod request;
pub mod tasks;

pub use color::Color;
pub use config::RenderConfig;
pub use error::{ErrorKind, RenderError, Result};
pub use renderer::{RasterizedText, RenderedArtifact, TattooRenderer};

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::config::RenderConfig;
    pub use crate::error::{ErrorKind, RenderError};
    pub use crate::font::{FontCatalog, FontResource};
    pub use crate::layout::{Canvas, TextMetrics};
    pub use crate::renderer::{RasterizedText, RenderedArtifact, TattooRenderer};
    pub use crate::request::{RawRequest, RenderRequest, SizeInput, ValidationError};
    pub use crate::tasks::{
        Dispatcher, DispatcherConfig, RenderJob, RetryPolicy, TaskState, TaskStatus,
    };
}
