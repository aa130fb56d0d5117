//! Name-to-path lookup for installed font files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::request::ValidationError;

const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

/// Outcome of [`FontCatalog::scan_dir`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Names newly added by the scan
    pub registered: Vec<String>,
    /// Names that were already present and left untouched
    pub skipped: Vec<String>,
}

/// Maps human-readable font names to font files.
#[derive(Debug, Clone, Default)]
pub struct FontCatalog {
    fonts: BTreeMap<String, PathBuf>,
}

impl FontCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font. An existing name keeps its original path.
    ///
    /// Returns `true` if the name was new.
    pub fn register(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> bool {
        let name = name.into();
        if self.fonts.contains_key(&name) {
            return false;
        }
        self.fonts.insert(name, path.into());
        true
    }

    /// Register every `.ttf`/`.otf` file directly inside `dir`.
    ///
    /// A file's name is everything before its first `.`, so `Lobster.Regular.ttf`
    /// registers as `Lobster`. Files are visited in sorted order so the first
    /// registration of a duplicated name is stable.
    pub fn scan_dir(&mut self, dir: &Path) -> std::io::Result<ScanReport> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_font_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut report = ScanReport::default();
        for path in paths {
            let Some(name) = font_name_from_path(&path) else {
                continue;
            };
            if self.register(name.clone(), path) {
                log::info!("Registered new font: {}", name);
                report.registered.push(name);
            } else {
                log::debug!("Font '{}' is already registered", name);
                report.skipped.push(name);
            }
        }

        log::info!(
            "Font scan of {}: {} new, {} total",
            dir.display(),
            report.registered.len(),
            self.fonts.len()
        );
        Ok(report)
    }

    pub fn resolve(&self, name: &str) -> Option<&Path> {
        self.fonts.get(name).map(PathBuf::as_path)
    }

    /// Like [`resolve`](Self::resolve), but maps a miss to the error callers
    /// surface as "not found".
    pub fn require(&self, name: &str) -> Result<&Path, ValidationError> {
        self.resolve(name)
            .ok_or_else(|| ValidationError::FontNotFound(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FONT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn font_name_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let name = file_name.split('.').next()?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
