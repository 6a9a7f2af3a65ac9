//! tintcode - grammar/theme registries and highlight requests
//!
//! Grammar and theme collections are loaded once, indexed by name (and, for
//! grammars, by extension, first line and language token), and combined per
//! request to turn source text into styled markup.
//!
//! ```ignore
//! use tintcode::{GrammarRegistry, Highlighter, OutputFormat, ThemeRegistry};
//!
//! let grammars = GrammarRegistry::load_default()?;
//! let themes = ThemeRegistry::load_defaults()?;
//!
//! let grammar = grammars.lookup_by_extension("cs")?;
//! let theme = themes.lookup("InspiredGitHub")?;
//! let html = grammar.highlight_to_html("class X {}", theme)?;
//!
//! themes.release();
//! grammars.release();
//! ```

pub mod config;
pub mod config_paths;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod highlight;
pub mod index;
pub mod marshal;
pub mod shared;
pub mod theme;
pub mod tracing;

// Re-export commonly used types
pub use config::HighlightConfig;
pub use engine::{HighlightEngine, OutputFormat, SyntectEngine};
pub use error::{HighlightError, LookupKind};
pub use grammar::{Grammar, GrammarRegistry};
pub use highlight::{HighlightRequest, Highlighter};
pub use marshal::{BufferPolicy, RegistryBuffers};
pub use theme::{Theme, ThemeRegistry};
