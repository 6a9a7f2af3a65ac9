//! Theme registry and theme handles
//!
//! Themes are addressed by logical name only (e.g. "InspiredGitHub",
//! "Solarized (dark)"). The registry owns the engine's loaded theme
//! collection; [`Theme`] handles borrow it.
//!
//! Fallback selection is up to the caller, with [`ThemeRegistry::lookup_or`]
//! covering the common "configured theme, else a known default" case.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;
use std::sync::Arc;

use crate::config::HighlightConfig;
use crate::engine::{HighlightEngine, SyntectEngine};
use crate::error::{HighlightError, Result};
use crate::highlight::Highlighter;
use crate::index::NameIndex;
use crate::marshal::{call_with_growth, translate, GrowthError, RegistryBuffers, Subject};

/// Theme used when nothing else is configured
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Loaded theme collection indexed by name
pub struct ThemeRegistry<E: HighlightEngine = SyntectEngine> {
    engine: Arc<E>,
    themes: E::Themes,
    index: NameIndex,
}

impl ThemeRegistry<SyntectEngine> {
    /// Load syntect's bundled themes
    pub fn load_defaults() -> Result<Self> {
        Self::load_with(Arc::new(SyntectEngine), &RegistryBuffers::default())
    }

    /// Load syntect's bundled themes with the configured enumeration buffer
    pub fn from_config(config: &HighlightConfig) -> Result<Self> {
        Self::load_with(Arc::new(SyntectEngine), &config.registry_buffers())
    }
}

impl<E: HighlightEngine> ThemeRegistry<E> {
    /// Load the engine's theme collection and index every name it reports
    pub fn load_with(engine: Arc<E>, buffers: &RegistryBuffers) -> Result<Self> {
        let themes = engine
            .load_themes()
            .map_err(|e| translate(GrowthError::Engine(e), Subject::Collection))?;

        let list = match call_with_growth(&buffers.enumeration, |out| {
            engine.theme_names(&themes, out)
        }) {
            Ok(list) => list,
            Err(err) => {
                engine.release_themes(themes);
                return Err(translate(err, Subject::Collection));
            }
        };

        let index = NameIndex::from_list(&list, "theme");
        tracing::info!("Theme registry ready: {} themes", index.len());

        Ok(Self {
            engine,
            themes,
            index,
        })
    }

    /// Exact, case-sensitive lookup by logical name
    pub fn lookup(&self, name: &str) -> Result<Theme<'_, E>> {
        match self.index.get(name) {
            Some(name) => Ok(Theme {
                registry: self,
                name,
            }),
            None => {
                tracing::debug!("Theme {:?} not found", name);
                Err(HighlightError::theme_not_found(name))
            }
        }
    }

    /// Look up `name`, falling back to `fallback` if it is not loaded
    ///
    /// The error, if any, is about `fallback`.
    pub fn lookup_or(&self, name: &str, fallback: &str) -> Result<Theme<'_, E>> {
        self.lookup(name).or_else(|_| {
            tracing::warn!("Theme {:?} not found, falling back to {:?}", name, fallback);
            self.lookup(fallback)
        })
    }

    /// The configured theme, or the configured fallback
    pub fn configured(&self, config: &HighlightConfig) -> Result<Theme<'_, E>> {
        self.lookup_or(&config.theme, &config.fallback_theme)
    }

    /// Theme names in engine enumeration order
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.index.iter()
    }

    /// A handle for every theme, in engine enumeration order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Theme<'_, E>> + '_ {
        self.index.iter().map(move |name| Theme {
            registry: self,
            name,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Hand the collection back to the engine
    pub fn release(self) {
        tracing::debug!("Releasing theme registry ({} themes)", self.index.len());
        self.engine.release_themes(self.themes);
    }

    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    pub(crate) fn collection(&self) -> &E::Themes {
        &self.themes
    }
}

impl<E: HighlightEngine> fmt::Debug for ThemeRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeRegistry")
            .field("themes", &self.index.len())
            .finish()
    }
}

/// Named reference to one theme of a registry
pub struct Theme<'r, E: HighlightEngine = SyntectEngine> {
    registry: &'r ThemeRegistry<E>,
    name: &'r str,
}

impl<'r, E: HighlightEngine> Theme<'r, E> {
    pub fn name(&self) -> &'r str {
        self.name
    }

    pub fn registry(&self) -> &'r ThemeRegistry<E> {
        self.registry
    }

    /// CSS rules for markup rendered with [`OutputFormat::ClassedHtml`],
    /// with the default buffer policy
    ///
    /// [`OutputFormat::ClassedHtml`]: crate::engine::OutputFormat::ClassedHtml
    pub fn stylesheet(&self) -> Result<String> {
        Highlighter::default().stylesheet(*self)
    }
}

impl<E: HighlightEngine> Clone for Theme<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: HighlightEngine> Copy for Theme<'_, E> {}

impl<E: HighlightEngine> PartialEq for Theme<'_, E> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.registry, other.registry) && self.name == other.name
    }
}

impl<E: HighlightEngine> Eq for Theme<'_, E> {}

impl<E: HighlightEngine> Hash for Theme<'_, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self.registry, state);
        self.name.hash(state);
    }
}

impl<E: HighlightEngine> fmt::Debug for Theme<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Theme").field(&self.name).finish()
    }
}
