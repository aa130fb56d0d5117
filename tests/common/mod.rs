#![allow(dead_code)]

use std::path::PathBuf;

use cosmic_text::fontdb;
use image::RgbImage;

/// Families that cover basic Latin and ship as standalone `.ttf`/`.otf` files
/// on most Linux and macOS hosts. Kept in step with `visual_tests`.
const PREFERRED_FAMILIES: [&str; 6] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "FreeSans",
    "Arial",
    "Helvetica",
];

/// Locate an outline font to render with.
///
/// `TATTOO_TEST_FONT` wins if set. Otherwise system fonts are searched for a
/// standalone Latin face. Returns `None` when the host has no fonts, in which
/// case font-dependent tests skip.
pub fn test_font() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("TATTOO_TEST_FONT") {
        return Some(PathBuf::from(path));
    }

    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let candidates: Vec<(String, PathBuf)> = db
        .faces()
        .filter(|face| face.index == 0)
        .filter_map(|face| {
            let fontdb::Source::File(path) = &face.source else {
                return None;
            };
            let ext = path.extension()?.to_str()?.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" {
                return None;
            }
            let family = face.families.first()?.0.clone();
            Some((family, path.clone()))
        })
        .collect();

    for preferred in PREFERRED_FAMILIES {
        if let Some((_, path)) = candidates.iter().find(|(family, _)| family == preferred) {
            return Some(path.clone());
        }
    }

    candidates
        .into_iter()
        .find(|(family, _)| {
            !["Emoji", "Symbol", "Math", "Dingbat"]
                .iter()
                .any(|skip| family.contains(skip))
        })
        .map(|(_, path)| path)
}

/// Returns the font or prints why the calling test is being skipped.
macro_rules! require_font {
    () => {
        match common::test_font() {
            Some(path) => path,
            None => {
                eprintln!("skipping: no outline font found (set TATTOO_TEST_FONT)");
                return;
            }
        }
    };
}

/// Bounding box `(min_x, min_y, max_x, max_y)` of pixels that differ from
/// `background`, inclusive.
pub fn ink_box(image: &RgbImage, background: [u8; 3]) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0 == background {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
