//! Font loading.
//!
//! Each render call loads its own [`LoadedFont`]: a private font database
//! containing only the requested face, wrapped in a `FontSystem` for shaping.
//! System fonts are never consulted, so a run can't silently fall back to a
//! different family.

pub mod catalog;

use std::path::{Path, PathBuf};

use cosmic_text::{fontdb, Attrs, Family, FontSystem, Stretch, Style, Weight};

use crate::error::{RenderError, Result};

pub use catalog::{FontCatalog, ScanReport};

/// Locale handed to the shaper. The face database is private, so this only
/// affects script defaults for fallback, which never kicks in here.
const SHAPING_LOCALE: &str = "en-US";

/// A loadable font program paired with the pixel size to render it at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontResource {
    pub path: PathBuf,
    pub size: u32,
}

impl FontResource {
    pub fn new(path: impl Into<PathBuf>, size: u32) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    pub fn load(&self) -> Result<LoadedFont> {
        LoadedFont::load(&self.path)
    }
}

/// A single parsed face, ready for shaping.
pub struct LoadedFont {
    font_system: FontSystem,
    family: String,
    weight: Weight,
    style: Style,
    stretch: Stretch,
}

impl LoadedFont {
    /// Read and parse a TrueType or OpenType/CFF font program.
    ///
    /// Collections load their first face.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| {
            log::error!("Failed to load font from {}: {}", path.display(), e);
            RenderError::font_load(path, e.to_string())
        })?;

        let mut db = fontdb::Database::new();
        db.load_font_data(data);

        let Some(face) = db.faces().next() else {
            log::error!(
                "Failed to load font from {}: no usable face",
                path.display()
            );
            return Err(RenderError::font_load(
                path,
                "not a TrueType or OpenType font program",
            ));
        };

        let Some((family, _)) = face.families.first() else {
            return Err(RenderError::font_load(path, "font has no family name"));
        };

        let family = family.clone();
        let (weight, style, stretch) = (face.weight, face.style, face.stretch);

        log::debug!(
            "Loaded font '{}' ({:?}, {:?}) from {}",
            family,
            weight,
            style,
            path.display()
        );

        Ok(Self {
            font_system: FontSystem::new_with_locale_and_db(SHAPING_LOCALE.to_string(), db),
            family,
            weight,
            style,
            stretch,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub(crate) fn font_system_mut(&mut self) -> &mut FontSystem {
        &mut self.font_system
    }

    /// The shaping system together with attributes that select exactly the
    /// loaded face.
    pub(crate) fn parts(&mut self) -> (&mut FontSystem, Attrs<'_>) {
        let attrs = Attrs::new()
            .family(Family::Name(&self.family))
            .weight(self.weight)
            .style(self.style)
            .stretch(self.stretch);
        (&mut self.font_system, attrs)
    }
}
