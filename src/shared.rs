//! Process-wide registries
//!
//! Loading the bundled grammars takes tens of milliseconds, so hosts that
//! highlight from many places usually want exactly one registry of each
//! kind. These are built on first use and published to every thread; they
//! live for the rest of the process and are never released.

use once_cell::sync::OnceCell;

use crate::config::HighlightConfig;
use crate::error::Result;
use crate::grammar::GrammarRegistry;
use crate::theme::ThemeRegistry;

static GRAMMARS: OnceCell<GrammarRegistry> = OnceCell::new();
static THEMES: OnceCell<ThemeRegistry> = OnceCell::new();

/// The shared grammar registry (newline-preserving variants)
///
/// A failed load is returned to every caller that triggers it and retried
/// on the next call.
pub fn grammars() -> Result<&'static GrammarRegistry> {
    GRAMMARS.get_or_try_init(GrammarRegistry::load_default)
}

/// The shared theme registry
pub fn themes() -> Result<&'static ThemeRegistry> {
    THEMES.get_or_try_init(ThemeRegistry::load_defaults)
}

/// Load both shared registries from `config`
///
/// Only the first load is configured; once a registry exists it is kept and
/// `config` no longer applies to it.
pub fn init(config: &HighlightConfig) -> Result<()> {
    if GRAMMARS.get().is_some() || THEMES.get().is_some() {
        tracing::warn!("Shared registries already loaded, config only applies to missing ones");
    }
    GRAMMARS.get_or_try_init(|| GrammarRegistry::from_config(config))?;
    THEMES.get_or_try_init(|| ThemeRegistry::from_config(config))?;
    Ok(())
}
