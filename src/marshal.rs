//! Buffer marshalling for engine calls
//!
//! Engine answers land in fixed-capacity buffers. [`call_with_growth`] starts
//! at a policy's initial capacity and doubles on `BufferTooSmall`, up to a
//! bounded number of times, so large answers are either complete or refused.

use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, EngineResult, EngineStatus, OutputBuffer, NAME_DELIMITER};
use crate::error::{HighlightError, LookupKind};

/// Default capacity for rendered markup
pub const DEFAULT_RENDER_CAPACITY: usize = 40 * 1024;
/// Default capacity for name enumerations
pub const DEFAULT_ENUMERATION_CAPACITY: usize = 10 * 1024;
/// Default capacity for a single resolved grammar name
pub const DEFAULT_RESOLVE_CAPACITY: usize = 1024;
/// Default number of times a buffer may be doubled before giving up
pub const DEFAULT_MAX_DOUBLINGS: u32 = 8;

/// Starting capacity and growth bound for one kind of engine call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferPolicy {
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    #[serde(default = "default_max_doublings")]
    pub max_doublings: u32,
}

fn default_initial_capacity() -> usize {
    DEFAULT_RENDER_CAPACITY
}

fn default_max_doublings() -> u32 {
    DEFAULT_MAX_DOUBLINGS
}

impl Default for BufferPolicy {
    fn default() -> Self {
        Self::with_initial_capacity(DEFAULT_RENDER_CAPACITY)
    }
}

impl BufferPolicy {
    pub fn with_initial_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            max_doublings: DEFAULT_MAX_DOUBLINGS,
        }
    }

    /// Largest capacity this policy will ever try
    pub fn max_capacity(&self) -> usize {
        self.initial_capacity
            .max(1)
            .saturating_mul(1usize.checked_shl(self.max_doublings).unwrap_or(usize::MAX))
    }
}

/// Buffer policies a registry uses while loading and resolving names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryBuffers {
    /// Full name enumeration at load time
    pub enumeration: BufferPolicy,
    /// Single canonical name returned by extension/first-line/token lookups
    pub resolve: BufferPolicy,
}

impl Default for RegistryBuffers {
    fn default() -> Self {
        Self {
            enumeration: BufferPolicy::with_initial_capacity(DEFAULT_ENUMERATION_CAPACITY),
            resolve: BufferPolicy::with_initial_capacity(DEFAULT_RESOLVE_CAPACITY),
        }
    }
}

/// Run `call` against a buffer, growing it on `BufferTooSmall`
///
/// When the engine reports the size it needs, the retry uses exactly that
/// capacity; otherwise the capacity doubles. Each retry counts against
/// `max_doublings`, and no capacity beyond [`BufferPolicy::max_capacity`] is
/// ever tried. Returns the raw engine error for anything but exhaustion, so
/// the caller can translate it with the context it knows about.
pub fn call_with_growth<F>(policy: &BufferPolicy, mut call: F) -> Result<String, GrowthError>
where
    F: FnMut(&mut OutputBuffer) -> EngineResult,
{
    let max_capacity = policy.max_capacity();
    let mut capacity = policy.initial_capacity.max(1);
    let mut retries = 0;

    loop {
        let mut out = OutputBuffer::with_capacity(capacity);
        match call(&mut out) {
            Ok(_) => return Ok(out.into_string()),
            Err(err) if err.status == EngineStatus::BufferTooSmall => {
                let next = match err.required {
                    Some(required) if required > capacity => required,
                    _ => capacity.saturating_mul(2),
                };
                if retries >= policy.max_doublings || next > max_capacity {
                    tracing::warn!(
                        "Engine output exceeds the {} byte limit (last tried {}, retries {})",
                        max_capacity,
                        capacity,
                        retries
                    );
                    return Err(GrowthError::Exhausted {
                        capacity: max_capacity,
                    });
                }
                retries += 1;
                capacity = next;
                tracing::debug!("Retrying engine call with a {} byte buffer", capacity);
            }
            Err(err) => return Err(GrowthError::Engine(err)),
        }
    }
}

/// Outcome of a failed [`call_with_growth`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrowthError {
    /// The answer does not fit the largest capacity the policy allows
    Exhausted { capacity: usize },
    Engine(EngineError),
}

/// What an engine call was about, for translating its failure
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    /// A registry-wide call (load, enumerate)
    Collection,
    Grammar { key: &'a str, kind: LookupKind },
    Theme { key: &'a str },
    Render { grammar: &'a str, theme: &'a str },
}

/// Translate a growth failure into the public error taxonomy
pub fn translate(err: GrowthError, subject: Subject<'_>) -> HighlightError {
    let err = match err {
        GrowthError::Exhausted { capacity } => return HighlightError::BufferTooSmall { capacity },
        GrowthError::Engine(err) => err,
    };

    match (err.status, subject) {
        (EngineStatus::SyntaxNotFound, Subject::Grammar { key, kind }) => {
            HighlightError::grammar_not_found(key, kind)
        }
        (EngineStatus::SyntaxNotFound, Subject::Render { grammar, .. }) => {
            HighlightError::grammar_not_found(grammar, LookupKind::Name)
        }
        (EngineStatus::ThemeNotFound, Subject::Theme { key }) => {
            HighlightError::theme_not_found(key)
        }
        (EngineStatus::ThemeNotFound, Subject::Render { theme, .. }) => {
            HighlightError::theme_not_found(theme)
        }
        (status, _) => {
            tracing::error!("Engine fault ({}): {}", status, err.message);
            HighlightError::EngineFault {
                status,
                message: err.message,
            }
        }
    }
}

/// Split a delimited name list into names, in order
///
/// An empty list yields no names rather than one empty name.
pub fn split_names(list: &str) -> Vec<String> {
    if list.is_empty() {
        return Vec::new();
    }
    list.split(NAME_DELIMITER).map(str::to_string).collect()
}
