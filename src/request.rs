//! Request validation.
//!
//! Everything the renderer trusts about its inputs is established here:
//! text is trimmed and non-empty, the color is a strict hex triplet, and the
//! size is coerced and clamped into the configured range.

use thiserror::Error;

use crate::color::{is_hex_color, Color};
use crate::config::RenderConfig;

/// Longest text accepted, in Unicode scalar values.
pub const MAX_TEXT_CHARS: usize = 255;

/// Color used when a request does not specify one.
pub const DEFAULT_COLOR: &str = "#000000";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Text is required and cannot be empty.")]
    EmptyText,
    #[error("Text exceeds the maximum length of {max} characters ({len} given).")]
    TextTooLong { len: usize, max: usize },
    #[error("Font name is required.")]
    FontNameRequired,
    #[error("Font '{0}' not found.")]
    FontNotFound(String),
    #[error("Invalid color format '{0}'. Use hex color (e.g., #FF5733).")]
    InvalidColor(String),
}

/// A size as it arrived from the outside world, before coercion.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SizeInput {
    #[default]
    Missing,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl SizeInput {
    /// Coerce to an integer, if the input has a numeric reading.
    ///
    /// Floats truncate toward zero. Strings must hold a plain integer;
    /// decimal or exponent notation such as `"72.9"` has no reading.
    pub fn coerce(&self) -> Option<i64> {
        match self {
            SizeInput::Missing => None,
            SizeInput::Integer(v) => Some(*v),
            SizeInput::Float(v) => float_to_int(*v),
            SizeInput::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }

    /// Resolve to a usable font size. Never fails: numeric inputs clamp into
    /// range, everything else falls back to the configured default.
    pub fn resolve(&self, config: &RenderConfig) -> u32 {
        match self.coerce() {
            Some(size) => config.clamp_font_size(size),
            None => config.default_font_size,
        }
    }
}

fn float_to_int(v: f64) -> Option<i64> {
    v.is_finite().then(|| v.trunc() as i64)
}

impl From<i64> for SizeInput {
    fn from(v: i64) -> Self {
        SizeInput::Integer(v)
    }
}

impl From<f64> for SizeInput {
    fn from(v: f64) -> Self {
        SizeInput::Float(v)
    }
}

impl From<&str> for SizeInput {
    fn from(v: &str) -> Self {
        SizeInput::Text(v.to_string())
    }
}

/// Unvalidated request fields.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    pub text: String,
    pub font: String,
    pub color: Option<String>,
    pub size: SizeInput,
}

impl RawRequest {
    pub fn new(text: impl Into<String>, font: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            ..Default::default()
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn size(mut self, size: impl Into<SizeInput>) -> Self {
        self.size = size.into();
        self
    }
}

/// A request whose fields satisfy every precondition of the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub text: String,
    pub font_name: String,
    pub color: Color,
    pub size: u32,
}

impl RenderRequest {
    pub fn validate(raw: RawRequest, config: &RenderConfig) -> Result<Self, ValidationError> {
        let text = validate_text(&raw.text)?;

        let font_name = raw.font.trim();
        if font_name.is_empty() {
            return Err(ValidationError::FontNameRequired);
        }

        let color = raw.color.as_deref().unwrap_or(DEFAULT_COLOR).trim();
        if !is_hex_color(color) {
            return Err(ValidationError::InvalidColor(color.to_string()));
        }
        let color =
            Color::parse(color).map_err(|_| ValidationError::InvalidColor(color.to_string()))?;

        Ok(Self {
            text,
            font_name: font_name.to_string(),
            color,
            size: raw.size.resolve(config),
        })
    }
}

/// Trim surrounding whitespace and check the length limits.
pub fn validate_text(text: &str) -> Result<String, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    let len = text.chars().count();
    if len > MAX_TEXT_CHARS {
        return Err(ValidationError::TextTooLong {
            len,
            max: MAX_TEXT_CHARS,
        });
    }
    Ok(text.to_string())
}
