//! Shaping and ink measurement.
//!
//! A [`GlyphRun`] shapes the text once, rasterizes each glyph through a
//! `SwashCache`, and keeps both so the same glyph images that were measured
//! are the ones that get drawn.

use cosmic_text::{Buffer, CacheKey, Metrics, Shaping, SwashCache, SwashImage};

use crate::font::LoadedFont;

use super::TextMetrics;

/// A glyph at its integer pen position within the run's layout.
#[derive(Debug, Clone, Copy)]
struct PositionedGlyph {
    cache_key: CacheKey,
    x: i32,
    y: i32,
}

/// A shaped line of text together with its measured ink box.
pub struct GlyphRun {
    font: LoadedFont,
    swash_cache: SwashCache,
    glyphs: Vec<PositionedGlyph>,
    metrics: TextMetrics,
}

impl GlyphRun {
    /// Shape `text` at `font_size` pixels and measure the union of every
    /// glyph's rasterized bounds.
    ///
    /// Lines never wrap; explicit newlines start new lines spaced by
    /// `font_size * line_height_ratio`.
    pub fn shape(mut font: LoadedFont, text: &str, font_size: f32, line_height_ratio: f32) -> Self {
        let mut swash_cache = SwashCache::new();
        let mut glyphs = Vec::new();
        let mut bounds: Option<(i32, i32, i32, i32)> = None;

        {
            let (font_system, attrs) = font.parts();
            let metrics = Metrics::new(font_size, font_size * line_height_ratio);
            let mut buffer = Buffer::new(font_system, metrics);

            buffer.set_size(font_system, None, None);
            buffer.set_text(font_system, text, &attrs, Shaping::Advanced, None);
            buffer.shape_until_scroll(font_system, false);

            for run in buffer.layout_runs() {
                for glyph in run.glyphs.iter() {
                    let physical = glyph.physical((0.0, 0.0), 1.0);
                    let positioned = PositionedGlyph {
                        cache_key: physical.cache_key,
                        x: physical.x,
                        y: run.line_y as i32 + physical.y,
                    };

                    if let Some(image) = swash_cache.get_image(font_system, positioned.cache_key)
                    {
                        if let Some(ink) = ink_bounds(&positioned, image) {
                            bounds = Some(match bounds {
                                None => ink,
                                Some(b) => (
                                    b.0.min(ink.0),
                                    b.1.min(ink.1),
                                    b.2.max(ink.2),
                                    b.3.max(ink.3),
                                ),
                            });
                        }
                    }

                    glyphs.push(positioned);
                }
            }
        }

        let metrics = match bounds {
            Some((left, top, right, bottom)) => TextMetrics::from_bounds(left, top, right, bottom),
            None => TextMetrics::default(),
        };

        log::debug!(
            "Shaped {} glyphs in '{}' at {}px: {:?}",
            glyphs.len(),
            font.family(),
            font_size,
            metrics
        );

        Self {
            font,
            swash_cache,
            glyphs,
            metrics,
        }
    }

    pub fn metrics(&self) -> &TextMetrics {
        &self.metrics
    }

    /// Visit every glyph image with the layout position of its top-left pixel.
    pub fn for_each_glyph_image<F>(&mut self, mut f: F)
    where
        F: FnMut(i32, i32, &SwashImage),
    {
        let font_system = self.font.font_system_mut();
        for glyph in &self.glyphs {
            if let Some(image) = self.swash_cache.get_image(font_system, glyph.cache_key) {
                if image.placement.width == 0 || image.placement.height == 0 {
                    continue;
                }
                f(
                    glyph.x + image.placement.left,
                    glyph.y - image.placement.top,
                    image,
                );
            }
        }
    }
}

fn ink_bounds(glyph: &PositionedGlyph, image: &SwashImage) -> Option<(i32, i32, i32, i32)> {
    let placement = image.placement;
    if placement.width == 0 || placement.height == 0 {
        return None;
    }
    let left = glyph.x + placement.left;
    let top = glyph.y - placement.top;
    Some((
        left,
        top,
        left + placement.width as i32,
        top + placement.height as i32,
    ))
}
