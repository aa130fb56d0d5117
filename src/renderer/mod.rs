pub mod output;
pub mod raster;

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::color::Color;
use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::font::FontResource;
use crate::layout::{draw_origin, Canvas, GlyphRun, TextMetrics};

pub use output::encode_png;

/// A persisted render, handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Path of the newly written PNG
    pub path: PathBuf,
    /// Width of the image in pixels
    pub width: u32,
    /// Height of the image in pixels
    pub height: u32,
    /// Ink bounds of the text as measured before drawing
    pub metrics: TextMetrics,
}

/// An in-memory render that has not been written anywhere.
#[derive(Debug, Clone)]
pub struct RasterizedText {
    pub image: RgbImage,
    pub metrics: TextMetrics,
    pub canvas: Canvas,
    /// Pen origin the run was drawn at
    pub origin: (i32, i32),
}

impl RasterizedText {
    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }
}

/// Renders text into minimal, centered PNG artifacts.
///
/// The renderer holds only its configuration. Every call loads the font,
/// shapes, measures and rasterizes from scratch, so a single instance can be
/// shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct TattooRenderer {
    config: RenderConfig,
}

impl TattooRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `text` and write it to a new PNG under the output directory.
    ///
    /// `size` is expected to be clamped already; see
    /// [`RenderConfig::clamp_font_size`]. Fails with
    /// [`RenderError::FontLoad`] when the font can't be opened or parsed, in
    /// which case nothing is written.
    pub fn render(
        &self,
        text: &str,
        font_path: &Path,
        color: Color,
        size: u32,
    ) -> Result<RenderedArtifact> {
        let rasterized = self.rasterize(text, font_path, color, size)?;
        let png = rasterized.to_png()?;
        let path = output::write_artifact(&self.config.output_dir, &png)?;

        log::info!(
            "Rendered {}x{} artifact to {}",
            rasterized.canvas.width,
            rasterized.canvas.height,
            path.display()
        );

        Ok(RenderedArtifact {
            path,
            width: rasterized.canvas.width,
            height: rasterized.canvas.height,
            metrics: rasterized.metrics,
        })
    }

    /// Load, measure, lay out and draw, without touching the filesystem
    /// beyond reading the font.
    pub fn rasterize(
        &self,
        text: &str,
        font_path: &Path,
        color: Color,
        size: u32,
    ) -> Result<RasterizedText> {
        let resource = FontResource::new(font_path, size);
        let font = resource.load()?;

        let mut run = GlyphRun::shape(
            font,
            text,
            resource.size as f32,
            self.config.line_height_ratio,
        );
        let metrics = *run.metrics();
        if metrics.is_empty() {
            log::warn!("Text {:?} produced no ink; rendering a blank canvas", text);
        }

        let padding = self.config.padding_for(resource.size);
        let canvas = Canvas::for_metrics(&metrics, padding);
        if canvas.pixel_count() > self.config.max_canvas_pixels {
            return Err(RenderError::CanvasTooLarge {
                width: canvas.width,
                height: canvas.height,
                max_pixels: self.config.max_canvas_pixels,
            });
        }

        log::debug!(
            "Canvas {}x{} (padding {}) for {:?}",
            canvas.width,
            canvas.height,
            padding,
            metrics
        );

        let mut image = raster::fill_canvas(&canvas, self.config.background);
        let origin = draw_origin(&canvas, &metrics);
        raster::draw_glyph_run(&mut image, &mut run, origin, color);

        Ok(RasterizedText {
            image,
            metrics,
            canvas,
            origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TattooRenderer>();
    }

    #[test]
    fn test_missing_font_writes_nothing() {
        let out = tempfile::tempdir().unwrap();
        let renderer = TattooRenderer::new(RenderConfig::new().output_dir(out.path().join("t")));

        let err = renderer
            .render("Hi", Path::new("/no/such/font.ttf"), Color::BLACK, 100)
            .unwrap_err();

        assert!(matches!(err, RenderError::FontLoad { .. }));
        assert!(!out.path().join("t").exists());
    }
}
