use crate::{Result, VisualTestError};
use std::path::PathBuf;
use tattoo_text::{Color, RenderConfig, TattooRenderer};

/// A render to capture for comparison
pub struct CaptureConfig {
    pub text: String,
    pub font_path: PathBuf,
    pub color: Color,
    pub size: u32,
    /// Path where the rendered PNG will be saved
    pub output_path: PathBuf,
}

/// Render the configured text and save it as a PNG
pub fn capture_render(config: &CaptureConfig) -> Result<()> {
    let renderer = TattooRenderer::new(RenderConfig::default());
    let rasterized = renderer.rasterize(&config.text, &config.font_path, config.color, config.size)?;
    let png = rasterized.to_png()?;

    if let Some(parent) = config.output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config.output_path, png)?;

    // Verify the capture decodes back to the rendered dimensions
    let (width, height) = image::image_dimensions(&config.output_path)?;
    if (width, height) != (rasterized.canvas.width, rasterized.canvas.height) {
        return Err(VisualTestError::Capture(format!(
            "Saved {}x{} but rendered {}x{} at {}",
            width,
            height,
            rasterized.canvas.width,
            rasterized.canvas.height,
            config.output_path.display()
        )));
    }

    Ok(())
}
