//! Engine configuration.
//!
//! All tuning knobs live in [`RenderConfig`], which is handed to the renderer
//! at construction. Nothing is read from global state.

use std::path::PathBuf;

use crate::color::Color;

/// Default values for [`RenderConfig`].
pub mod defaults {
    /// Smallest font size a request may ask for.
    pub const MIN_FONT_SIZE: u32 = 12;
    /// Largest font size a request may ask for.
    pub const MAX_FONT_SIZE: u32 = 200;
    /// Used when the requested size cannot be read as a number.
    pub const DEFAULT_FONT_SIZE: u32 = 100;

    /// Lower bound of the margin around the ink box, in pixels.
    pub const MIN_PADDING: u32 = 10;
    /// Upper bound of the margin around the ink box, in pixels.
    pub const MAX_PADDING: u32 = 30;
    /// Margin as a fraction of the font size before clamping.
    pub const PADDING_RATIO: f32 = 0.1;

    /// Line height as a multiple of the font size.
    pub const LINE_HEIGHT_RATIO: f32 = 1.2;

    /// Canvases above this many pixels are refused before allocation.
    pub const MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

    /// Directory artifacts are written to unless configured otherwise.
    pub const OUTPUT_DIR: &str = "media/tattoos";
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub output_dir: PathBuf,
    pub min_padding: u32,
    pub max_padding: u32,
    pub padding_ratio: f32,
    pub min_font_size: u32,
    pub max_font_size: u32,
    pub default_font_size: u32,
    pub line_height_ratio: f32,
    pub background: Color,
    pub max_canvas_pixels: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            min_padding: defaults::MIN_PADDING,
            max_padding: defaults::MAX_PADDING,
            padding_ratio: defaults::PADDING_RATIO,
            min_font_size: defaults::MIN_FONT_SIZE,
            max_font_size: defaults::MAX_FONT_SIZE,
            default_font_size: defaults::DEFAULT_FONT_SIZE,
            line_height_ratio: defaults::LINE_HEIGHT_RATIO,
            background: Color::WHITE,
            max_canvas_pixels: defaults::MAX_CANVAS_PIXELS,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn padding(mut self, min: u32, max: u32, ratio: f32) -> Self {
        self.min_padding = min;
        self.max_padding = max;
        self.padding_ratio = ratio;
        self
    }

    pub fn font_size_range(mut self, min: u32, max: u32, default: u32) -> Self {
        self.min_font_size = min;
        self.max_font_size = max;
        self.default_font_size = default;
        self
    }

    pub fn line_height_ratio(mut self, ratio: f32) -> Self {
        self.line_height_ratio = ratio;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn max_canvas_pixels(mut self, pixels: u64) -> Self {
        self.max_canvas_pixels = pixels;
        self
    }

    /// Clamp a requested font size into `[min_font_size, max_font_size]`.
    pub fn clamp_font_size(&self, size: i64) -> u32 {
        size.clamp(self.min_font_size as i64, self.max_font_size as i64) as u32
    }

    /// Margin around the ink box for a given font size.
    ///
    /// `size * padding_ratio` is truncated to whole pixels, capped at
    /// `max_padding`, then raised to at least `min_padding`.
    pub fn padding_for(&self, size: u32) -> u32 {
        let scaled = (size as f32 * self.padding_ratio) as u32;
        scaled.min(self.max_padding).max(self.min_padding)
    }
}
