//! CPU compositing of glyph images onto an RGB canvas.

use cosmic_text::{SwashContent, SwashImage};
use image::{Rgb, RgbImage};

use crate::color::Color;
use crate::layout::{Canvas, GlyphRun};

/// Allocate a canvas filled with a solid background.
pub fn fill_canvas(canvas: &Canvas, background: Color) -> RgbImage {
    RgbImage::from_pixel(canvas.width, canvas.height, background.to_rgb())
}

/// Draw every glyph of `run` with its pen origin at `origin`.
///
/// Coverage outside the canvas is clipped.
pub fn draw_glyph_run(target: &mut RgbImage, run: &mut GlyphRun, origin: (i32, i32), color: Color) {
    run.for_each_glyph_image(|x, y, image| {
        draw_glyph(target, origin.0 + x, origin.1 + y, image, color);
    });
}

fn draw_glyph(target: &mut RgbImage, left: i32, top: i32, image: &SwashImage, color: Color) {
    let width = image.placement.width as i32;
    let height = image.placement.height as i32;
    let (canvas_w, canvas_h) = (target.width() as i32, target.height() as i32);

    for gy in 0..height {
        let py = top + gy;
        if py < 0 || py >= canvas_h {
            continue;
        }
        for gx in 0..width {
            let px = left + gx;
            if px < 0 || px >= canvas_w {
                continue;
            }

            let i = (gy * width + gx) as usize;
            let pixel = target.get_pixel_mut(px as u32, py as u32);
            match image.content {
                SwashContent::Mask => {
                    let Some(&alpha) = image.data.get(i) else {
                        continue;
                    };
                    *pixel = blend(*pixel, color.to_rgb(), [alpha; 3]);
                }
                SwashContent::Color => {
                    let Some(rgba) = image.data.get(i * 4..i * 4 + 4) else {
                        continue;
                    };
                    *pixel = blend(*pixel, Rgb([rgba[0], rgba[1], rgba[2]]), [rgba[3]; 3]);
                }
                SwashContent::SubpixelMask => {
                    let Some(coverage) = image.data.get(i * 4..i * 4 + 3) else {
                        continue;
                    };
                    *pixel = blend(
                        *pixel,
                        color.to_rgb(),
                        [coverage[0], coverage[1], coverage[2]],
                    );
                }
            }
        }
    }
}

/// Source-over blend with independent coverage per channel.
fn blend(dst: Rgb<u8>, src: Rgb<u8>, coverage: [u8; 3]) -> Rgb<u8> {
    Rgb([
        blend_channel(dst[0], src[0], coverage[0]),
        blend_channel(dst[1], src[1], coverage[1]),
        blend_channel(dst[2], src[2], coverage[2]),
    ])
}

fn blend_channel(dst: u8, src: u8, alpha: u8) -> u8 {
    let alpha = alpha as u32;
    ((src as u32 * alpha + dst as u32 * (255 - alpha) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_channel_extremes() {
        assert_eq!(blend_channel(255, 0, 0), 255);
        assert_eq!(blend_channel(255, 0, 255), 0);
        assert_eq!(blend_channel(0, 200, 255), 200);
        assert_eq!(blend_channel(255, 0, 128), 127);
    }

    #[test]
    fn test_blend_per_channel() {
        let out = blend(Rgb([255, 255, 255]), Rgb([255, 0, 0]), [255, 255, 0]);
        assert_eq!(out, Rgb([255, 0, 255]));
    }

    #[test]
    fn test_fill_canvas() {
        let canvas = Canvas {
            width: 7,
            height: 3,
            padding: 1,
        };
        let image = fill_canvas(&canvas, Color::WHITE);
        assert_eq!(image.dimensions(), (7, 3));
        assert!(image.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }
}
