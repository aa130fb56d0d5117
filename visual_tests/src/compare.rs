use crate::{Result, VisualTestError};
use image::{Rgb, RgbImage};
use image_compare::Algorithm;
use std::path::Path;

/// Result of comparing two images
pub struct CompareResult {
    /// Similarity score from 0.0 to 1.0
    pub similarity: f64,
    /// Number of pixels whose channels differ by more than the diff tolerance
    pub differing_pixels: u64,
}

/// Channel difference below which two pixels count as equal
const DIFF_TOLERANCE: u8 = 10;

/// Compare two PNG files using SSIM
pub fn compare_images(reference: &Path, captured: &Path) -> Result<CompareResult> {
    let ref_rgb = image::open(reference)?.to_rgb8();
    let cap_rgb = image::open(captured)?.to_rgb8();
    compare_rgb(&ref_rgb, &cap_rgb)
}

/// Compare two in-memory renders using SSIM
pub fn compare_rgb(reference: &RgbImage, captured: &RgbImage) -> Result<CompareResult> {
    // Canvas size follows the ink box, so a size change is already a layout regression
    if reference.dimensions() != captured.dimensions() {
        return Err(VisualTestError::Compare(format!(
            "Canvas sizes don't match: reference {:?} vs captured {:?}",
            reference.dimensions(),
            captured.dimensions()
        )));
    }

    let result =
        image_compare::rgb_similarity_structure(&Algorithm::MSSIMSimple, reference, captured)
            .map_err(|e| VisualTestError::Compare(format!("SSIM comparison failed: {}", e)))?;

    let differing_pixels = reference
        .pixels()
        .zip(captured.pixels())
        .filter(|(a, b)| pixel_difference(a, b) > DIFF_TOLERANCE)
        .count() as u64;

    Ok(CompareResult {
        similarity: result.score,
        differing_pixels,
    })
}

/// Write a diff image: differing pixels in red, everything else as a faded
/// copy of the capture
pub fn generate_diff_image(reference: &Path, captured: &Path, output: &Path) -> Result<()> {
    let ref_rgb = image::open(reference)?.to_rgb8();
    let cap_rgb = image::open(captured)?.to_rgb8();
    diff_rgb(&ref_rgb, &cap_rgb).save(output)?;
    Ok(())
}

/// Build the diff image over the overlapping area of two renders
pub fn diff_rgb(reference: &RgbImage, captured: &RgbImage) -> RgbImage {
    let width = reference.width().min(captured.width());
    let height = reference.height().min(captured.height());

    RgbImage::from_fn(width, height, |x, y| {
        let ref_pixel = reference.get_pixel(x, y);
        let cap_pixel = captured.get_pixel(x, y);
        let diff = pixel_difference(ref_pixel, cap_pixel);

        if diff > DIFF_TOLERANCE {
            let intensity = (diff as f32 / 255.0 * 200.0 + 55.0) as u8;
            Rgb([intensity, 0, 0])
        } else {
            // Fade towards white so the red stands out on light canvases
            let fade = |c: u8| 170 + c / 3;
            Rgb([fade(cap_pixel[0]), fade(cap_pixel[1]), fade(cap_pixel[2])])
        }
    })
}

/// Calculate the maximum channel difference between two pixels
fn pixel_difference(a: &Rgb<u8>, b: &Rgb<u8>) -> u8 {
    let dr = (a[0] as i16 - b[0] as i16).unsigned_abs() as u8;
    let dg = (a[1] as i16 - b[1] as i16).unsigned_abs() as u8;
    let db = (a[2] as i16 - b[2] as i16).unsigned_abs() as u8;
    dr.max(dg).max(db)
}
