//! Canvas layout for a single glyph run.
//!
//! The canvas is the ink box of the run plus a uniform margin. The ink box
//! comes from the rasterized glyph images, so side bearings, overshoot and
//! descenders are all accounted for.

pub mod measure;

pub use measure::GlyphRun;

/// Ink bounds of a glyph run, relative to the pen origin of its layout.
///
/// `left` and `top` may be negative or non-zero. `width = right - left` and
/// `height = bottom - top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextMetrics {
    pub fn from_bounds(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            width: right.saturating_sub(left).max(0) as u32,
            height: bottom.saturating_sub(top).max(0) as u32,
            left,
            top,
            right,
            bottom,
        }
    }

    /// True when the run produced no ink at all (whitespace only).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
}

impl Canvas {
    /// The smallest canvas holding the ink box with `padding` on every side.
    pub fn for_metrics(metrics: &TextMetrics, padding: u32) -> Self {
        Self {
            width: (metrics.width + 2 * padding).max(1),
            height: (metrics.height + 2 * padding).max(1),
            padding,
        }
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Where the ink box's top-left corner lands on the canvas.
pub fn ink_origin(canvas: &Canvas, metrics: &TextMetrics) -> (i32, i32) {
    (
        (canvas.width.saturating_sub(metrics.width) / 2) as i32,
        (canvas.height.saturating_sub(metrics.height) / 2) as i32,
    )
}

/// Pen position to draw the run at so its ink box is centered on the canvas.
pub fn draw_origin(canvas: &Canvas, metrics: &TextMetrics) -> (i32, i32) {
    let (x, y) = ink_origin(canvas, metrics);
    (x - metrics.left, y - metrics.top)
}
