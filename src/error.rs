//! Error taxonomy for registry lookups and highlight requests
//!
//! Engine calls report an [`EngineStatus`]; everything that leaves the crate
//! is a [`HighlightError`] carrying the offending key and lookup kind.

use std::fmt;

use crate::engine::EngineStatus;

/// Which lookup path produced a grammar miss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    /// Exact logical name
    Name,
    /// File extension (without the leading dot)
    Extension,
    /// First line of content (shebang, mode line, XML declaration)
    FirstLine,
    /// Language token such as a fenced code block tag
    Token,
}

impl LookupKind {
    /// Human readable label used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            LookupKind::Name => "grammar",
            LookupKind::Extension => "extension",
            LookupKind::FirstLine => "first line",
            LookupKind::Token => "token",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure surfaced by a registry or a highlight request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HighlightError {
    #[error("the given {kind} '{key}' was not found in the grammar registry")]
    GrammarNotFound { key: String, kind: LookupKind },

    #[error("the given theme '{key}' was not found in the theme registry")]
    ThemeNotFound { key: String },

    #[error("engine output did not fit in a {capacity} byte buffer")]
    BufferTooSmall { capacity: usize },

    #[error("highlighting engine fault ({status}): {message}")]
    EngineFault {
        status: EngineStatus,
        message: String,
    },
}

impl HighlightError {
    pub fn grammar_not_found(key: impl Into<String>, kind: LookupKind) -> Self {
        HighlightError::GrammarNotFound {
            key: key.into(),
            kind,
        }
    }

    pub fn theme_not_found(key: impl Into<String>) -> Self {
        HighlightError::ThemeNotFound { key: key.into() }
    }

    /// Not-found failures can be recovered from by picking another key.
    ///
    /// `BufferTooSmall` is only surfaced after the retry loop gave up, and
    /// engine faults are terminal for the request, so neither counts.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HighlightError::GrammarNotFound { .. } | HighlightError::ThemeNotFound { .. }
        )
    }

    /// The lookup key this failure is about, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            HighlightError::GrammarNotFound { key, .. } | HighlightError::ThemeNotFound { key } => {
                Some(key)
            }
            _ => None,
        }
    }
}

pub type Result<T, E = HighlightError> = std::result::Result<T, E>;
