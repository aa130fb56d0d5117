mod capture;
mod compare;

pub use capture::{capture_render, CaptureConfig};
pub use compare::{
    compare_images, compare_rgb, diff_rgb, generate_diff_image, CompareResult,
};

use cosmic_text::fontdb;
use std::path::{Path, PathBuf};
use tattoo_text::{Color, RenderError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualTestError {
    #[error("Failed to capture render: {0}")]
    Capture(String),
    #[error("Failed to compare images: {0}")]
    Compare(String),
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, VisualTestError>;

/// Configuration for a visual test
#[derive(Clone)]
pub struct VisualTestConfig {
    /// Name of the case, used for reference and output file names
    pub case_name: String,
    pub text: String,
    pub font_path: PathBuf,
    pub color: Color,
    pub size: u32,
    /// Similarity threshold (0.0 to 1.0, default 0.999)
    pub similarity_threshold: f64,
}

impl VisualTestConfig {
    pub fn new(case_name: &str, text: &str, font_path: &Path, color: Color, size: u32) -> Self {
        Self {
            case_name: case_name.to_string(),
            text: text.to_string(),
            font_path: font_path.to_path_buf(),
            color,
            size,
            similarity_threshold: 0.999,
        }
    }

    fn capture_to(&self, output_path: PathBuf) -> CaptureConfig {
        CaptureConfig {
            text: self.text.clone(),
            font_path: self.font_path.clone(),
            color: self.color,
            size: self.size,
            output_path,
        }
    }

    /// References are only comparable when rendered with the same font file
    fn font_key(&self) -> String {
        self.font_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string()
    }
}

/// Outcome of a visual test
pub enum VisualTestOutcome {
    /// No reference existed yet; the capture was recorded as the new baseline
    Recorded(PathBuf),
    Compared(VisualTestResult),
}

/// Result of a visual comparison
pub struct VisualTestResult {
    /// Whether the test passed (similarity >= threshold)
    pub passed: bool,
    /// The similarity score (0.0 to 1.0)
    pub similarity: f64,
    pub differing_pixels: u64,
    pub captured_path: PathBuf,
    pub reference_path: PathBuf,
    /// Path to diff image (if generated on failure)
    pub diff_path: Option<PathBuf>,
}

/// Get the path to the references directory
pub fn references_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("references")
}

/// Get the path to a reference image for a case
pub fn reference_path(config: &VisualTestConfig) -> PathBuf {
    references_dir()
        .join(config.font_key())
        .join(format!("{}.png", config.case_name))
}

/// Get the path to the output directory for test artifacts
pub fn output_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("output")
}

pub fn captured_path(case_name: &str) -> PathBuf {
    output_dir().join(format!("{}_captured.png", case_name))
}

pub fn diff_path(case_name: &str) -> PathBuf {
    output_dir().join(format!("{}_diff.png", case_name))
}

/// Run a visual regression test, recording the baseline if none exists
pub fn run_visual_test(config: &VisualTestConfig) -> Result<VisualTestOutcome> {
    let ref_path = reference_path(config);
    if !ref_path.exists() {
        return update_reference(config).map(VisualTestOutcome::Recorded);
    }

    std::fs::create_dir_all(output_dir())?;
    let cap_path = captured_path(&config.case_name);
    capture_render(&config.capture_to(cap_path.clone()))?;

    let compare_result = compare_images(&ref_path, &cap_path)?;
    let passed = compare_result.similarity >= config.similarity_threshold;

    let diff = if !passed {
        let diff_file = diff_path(&config.case_name);
        generate_diff_image(&ref_path, &cap_path, &diff_file)?;
        Some(diff_file)
    } else {
        None
    };

    Ok(VisualTestOutcome::Compared(VisualTestResult {
        passed,
        similarity: compare_result.similarity,
        differing_pixels: compare_result.differing_pixels,
        captured_path: cap_path,
        reference_path: ref_path,
        diff_path: diff,
    }))
}

/// Render a case straight to its reference path
pub fn update_reference(config: &VisualTestConfig) -> Result<PathBuf> {
    let ref_path = reference_path(config);
    capture_render(&config.capture_to(ref_path.clone()))?;

    println!("Updated reference: {}", ref_path.display());
    Ok(ref_path)
}

/// Check if we're in update references mode
pub fn should_update_references() -> bool {
    std::env::var("UPDATE_REFERENCES").is_ok()
}

/// Families that cover basic Latin and ship as standalone `.ttf`/`.otf` files
/// on most Linux and macOS hosts. Kept in step with the root crate's tests.
const PREFERRED_FAMILIES: [&str; 6] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "FreeSans",
    "Arial",
    "Helvetica",
];

/// Locate a font to render the cases with.
///
/// `TATTOO_TEST_FONT` wins; otherwise system fonts are searched through
/// fontdb, preferring the families above, then any non-symbol Latin face.
pub fn find_test_font() -> Option<PathBuf> {
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
