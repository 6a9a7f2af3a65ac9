//! Highlighting engine boundary
//!
//! The registries and the request orchestrator never tokenize or render
//! anything themselves. They drive a [`HighlightEngine`], which hands out
//! opaque collection values and writes every answer into a fixed-capacity
//! [`OutputBuffer`].
//!
//! ## Protocol
//!
//! ```text
//! load_grammars / load_themes   → opaque collection (owned by a registry)
//! grammar_names / theme_names   → "name\nname\n..." into OutputBuffer
//! grammar_by_*                  → canonical grammar name into OutputBuffer
//! render                        → markup into OutputBuffer
//! release_grammars / _themes    ← collection handed back by the registry
//! ```
//!
//! Every call that writes returns the number of bytes written, or an
//! [`EngineError`] whose [`EngineStatus`] is one of a closed set of codes.

mod syntect_engine;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use syntect_engine::{SyntectEngine, SyntectGrammars, SyntectThemes};

/// Record delimiter for name enumerations
pub const NAME_DELIMITER: char = '\n';

/// Engine status codes
///
/// The numeric values are stable and match what engines report across an
/// FFI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum EngineStatus {
    General = -1,
    BufferTooSmall = -10,
    BufferNull = -11,
    SyntaxNotFound = -20,
    SyntaxSetNull = -21,
    ThemeNotFound = -30,
    ThemeSetNull = -31,
}

impl EngineStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Map a raw status code back to a status. Zero and positive values are
    /// byte counts, not statuses.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(EngineStatus::General),
            -10 => Some(EngineStatus::BufferTooSmall),
            -11 => Some(EngineStatus::BufferNull),
            -20 => Some(EngineStatus::SyntaxNotFound),
            -21 => Some(EngineStatus::SyntaxSetNull),
            -30 => Some(EngineStatus::ThemeNotFound),
            -31 => Some(EngineStatus::ThemeSetNull),
            _ => None,
        }
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineStatus::General => "general",
            EngineStatus::BufferTooSmall => "buffer too small",
            EngineStatus::BufferNull => "null buffer",
            EngineStatus::SyntaxNotFound => "syntax not found",
            EngineStatus::SyntaxSetNull => "null syntax set",
            EngineStatus::ThemeNotFound => "theme not found",
            EngineStatus::ThemeSetNull => "null theme set",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// A failed engine call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct EngineError {
    pub status: EngineStatus,
    pub message: String,
    /// Capacity the answer needs, when a `BufferTooSmall` engine knows it
    pub required: Option<usize>,
}

impl EngineError {
    pub fn new(status: EngineStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            required: None,
        }
    }

    /// `BufferTooSmall` carrying the exact size the answer needs
    pub fn buffer_too_small(required: usize, capacity: usize) -> Self {
        Self {
            required: Some(required),
            ..Self::new(
                EngineStatus::BufferTooSmall,
                format!("need {} bytes but the buffer holds {}", required, capacity),
            )
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self::new(EngineStatus::General, message)
    }
}

/// Bytes written on success
pub type EngineResult = Result<usize, EngineError>;

/// Target markup format for a render call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// HTML with inline `style` attributes taken from the theme
    #[default]
    Html,
    /// HTML with CSS classes; pair with a theme stylesheet
    ClassedHtml,
}

/// Fixed-capacity destination for one engine answer
///
/// A write that does not fit is refused outright with
/// [`EngineStatus::BufferTooSmall`] and leaves the buffer unchanged, so a
/// caller can never observe truncated output.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    data: String,
    capacity: usize,
}

impl OutputBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: String::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Replace the contents with `text`
    pub fn fill(&mut self, text: &str) -> EngineResult {
        if text.len() > self.capacity {
            return Err(EngineError::buffer_too_small(text.len(), self.capacity));
        }
        self.data.clear();
        self.data.push_str(text);
        Ok(text.len())
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_string(self) -> String {
        self.data
    }
}

/// Write a delimited name list, refusing names that contain the delimiter
pub fn write_names<'a>(
    names: impl IntoIterator<Item = &'a str>,
    out: &mut OutputBuffer,
) -> EngineResult {
    let mut joined = String::new();
    for (i, name) in names.into_iter().enumerate() {
        if name.contains(NAME_DELIMITER) {
            return Err(EngineError::general(format!(
                "name {:?} contains the record delimiter",
                name
            )));
        }
        if i > 0 {
            joined.push(NAME_DELIMITER);
        }
        joined.push_str(name);
    }
    out.fill(&joined)
}

/// Everything a render call needs
pub struct RenderRequest<'a, E: HighlightEngine + ?Sized> {
    pub text: &'a str,
    pub grammars: &'a E::Grammars,
    pub grammar: &'a str,
    pub themes: &'a E::Themes,
    pub theme: &'a str,
    pub format: OutputFormat,
}

/// Tokenize-and-render capability consumed by the registries
///
/// Collections returned by the `load_*` methods are owned by exactly one
/// registry and handed back through the matching `release_*` method.
pub trait HighlightEngine {
    /// Loaded grammar collection
    type Grammars;
    /// Loaded theme collection
    type Themes;

    fn load_grammars(&self, newline_variants: bool) -> Result<Self::Grammars, EngineError>;

    fn release_grammars(&self, grammars: Self::Grammars) {
        drop(grammars);
    }

    /// Write all grammar names, delimited by [`NAME_DELIMITER`]
    fn grammar_names(&self, grammars: &Self::Grammars, out: &mut OutputBuffer) -> EngineResult;

    /// Write the canonical name of the grammar registered for `ext`
    fn grammar_by_extension(
        &self,
        grammars: &Self::Grammars,
        ext: &str,
        out: &mut OutputBuffer,
    ) -> EngineResult;

    /// Write the canonical name of the grammar recognizing `line` as a first line
    fn grammar_by_first_line(
        &self,
        grammars: &Self::Grammars,
        line: &str,
        out: &mut OutputBuffer,
    ) -> EngineResult;

    /// Write the canonical name of the grammar matching a language token
    fn grammar_by_token(
        &self,
        grammars: &Self::Grammars,
        token: &str,
        out: &mut OutputBuffer,
    ) -> EngineResult;

    fn load_themes(&self) -> Result<Self::Themes, EngineError>;

    fn release_themes(&self, themes: Self::Themes) {
        drop(themes);
    }

    /// Write all theme names, delimited by [`NAME_DELIMITER`]
    fn theme_names(&self, themes: &Self::Themes, out: &mut OutputBuffer) -> EngineResult;

    /// Write the CSS stylesheet matching [`OutputFormat::ClassedHtml`] output
    fn stylesheet(
        &self,
        themes: &Self::Themes,
        theme: &str,
        out: &mut OutputBuffer,
    ) -> EngineResult;

    fn render(&self, request: &RenderRequest<'_, Self>, out: &mut OutputBuffer) -> EngineResult;
}
