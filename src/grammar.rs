//! Grammar registry and grammar handles
//!
//! A [`GrammarRegistry`] owns the engine's loaded grammar collection and an
//! immutable index of grammar names in engine enumeration order. Lookups hand
//! out [`Grammar`] handles that borrow the registry, so the registry cannot be
//! released while any handle is alive.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::ptr;
use std::sync::Arc;

use crate::config::HighlightConfig;
use crate::engine::{EngineResult, HighlightEngine, OutputBuffer, OutputFormat, SyntectEngine};
use crate::error::{HighlightError, LookupKind, Result};
use crate::highlight::Highlighter;
use crate::index::NameIndex;
use crate::marshal::{
    call_with_growth, translate, BufferPolicy, GrowthError, RegistryBuffers, Subject,
};
use crate::theme::Theme;

/// Name of the grammar [`GrammarRegistry::detect`] falls back to
pub const PLAIN_TEXT: &str = "Plain Text";

/// Loaded grammar collection indexed by name
pub struct GrammarRegistry<E: HighlightEngine = SyntectEngine> {
    engine: Arc<E>,
    grammars: E::Grammars,
    index: NameIndex,
    resolve: BufferPolicy,
    newline_variants: bool,
}

impl GrammarRegistry<SyntectEngine> {
    /// Load syntect's bundled grammars, with newline-preserving variants
    pub fn load_default() -> Result<Self> {
        Self::load_defaults(true)
    }

    /// Load syntect's bundled grammars
    pub fn load_defaults(newline_variants: bool) -> Result<Self> {
        Self::load_with(
            Arc::new(SyntectEngine),
            newline_variants,
            &RegistryBuffers::default(),
        )
    }

    /// Load syntect's bundled grammars with the configured variants and
    /// enumeration/resolve buffers
    pub fn from_config(config: &HighlightConfig) -> Result<Self> {
        Self::load_with(
            Arc::new(SyntectEngine),
            config.newline_variants,
            &config.registry_buffers(),
        )
    }
}

impl<E: HighlightEngine> GrammarRegistry<E> {
    /// Load the engine's grammar collection and index every name it reports
    ///
    /// No registry is returned unless both the load and the enumeration
    /// succeed; a collection whose names cannot be enumerated is handed back
    /// to the engine before the error is returned.
    pub fn load_with(
        engine: Arc<E>,
        newline_variants: bool,
        buffers: &RegistryBuffers,
    ) -> Result<Self> {
        let grammars = engine
            .load_grammars(newline_variants)
            .map_err(|e| translate(GrowthError::Engine(e), Subject::Collection))?;

        let list = match call_with_growth(&buffers.enumeration, |out| {
            engine.grammar_names(&grammars, out)
        }) {
            Ok(list) => list,
            Err(err) => {
                engine.release_grammars(grammars);
                return Err(translate(err, Subject::Collection));
            }
        };

        let index = NameIndex::from_list(&list, "grammar");
        tracing::info!(
            "Grammar registry ready: {} grammars (newline variants: {})",
            index.len(),
            newline_variants
        );

        Ok(Self {
            engine,
            grammars,
            index,
            resolve: buffers.resolve,
            newline_variants,
        })
    }

    /// Exact, case-sensitive lookup by logical name
    pub fn lookup(&self, name: &str) -> Result<Grammar<'_, E>> {
        match self.index.get(name) {
            Some(name) => Ok(Grammar {
                registry: self,
                name,
            }),
            None => {
                tracing::debug!("Grammar {:?} not found", name);
                Err(HighlightError::grammar_not_found(name, LookupKind::Name))
            }
        }
    }

    /// Resolve a file extension (without the dot) to its grammar
    pub fn lookup_by_extension(&self, ext: &str) -> Result<Grammar<'_, E>> {
        self.resolve(ext, LookupKind::Extension, E::grammar_by_extension)
    }

    /// Resolve a first line of content (e.g. `#!/bin/bash`) to its grammar
    pub fn lookup_by_first_line(&self, line: &str) -> Result<Grammar<'_, E>> {
        self.resolve(line, LookupKind::FirstLine, E::grammar_by_first_line)
    }

    /// Resolve a language token such as a code fence tag (`rust`, `py`)
    pub fn lookup_by_token(&self, token: &str) -> Result<Grammar<'_, E>> {
        self.resolve(token, LookupKind::Token, E::grammar_by_token)
    }

    fn resolve<F>(&self, key: &str, kind: LookupKind, call: F) -> Result<Grammar<'_, E>>
    where
        F: Fn(&E, &E::Grammars, &str, &mut OutputBuffer) -> EngineResult,
    {
        let name = call_with_growth(&self.resolve, |out| {
            call(&*self.engine, &self.grammars, key, out)
        })
        .map_err(|err| {
            let err = translate(err, Subject::Grammar { key, kind });
            tracing::debug!("{}", err);
            err
        })?;

        self.lookup(&name)
    }

    /// Pick a grammar for a file: by file name or extension of `path`, then
    /// by the first line of `text`, then [`PLAIN_TEXT`]
    pub fn detect(&self, path: Option<&Path>, text: &str) -> Result<Grammar<'_, E>> {
        let candidates = path
            .into_iter()
            .flat_map(|p| [p.file_name(), p.extension()])
            .flatten()
            .filter_map(|s| s.to_str());

        for candidate in candidates {
            match self.lookup_by_extension(candidate) {
                Ok(grammar) => return Ok(grammar),
                Err(e) if e.is_recoverable() => {}
                Err(e) => return Err(e),
            }
        }

        if let Some(first_line) = text.lines().next() {
            match self.lookup_by_first_line(first_line) {
                Ok(grammar) => return Ok(grammar),
                Err(e) if e.is_recoverable() => {}
                Err(e) => return Err(e),
            }
        }

        self.lookup(PLAIN_TEXT)
    }

    /// Grammar names in engine enumeration order
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.index.iter()
    }

    /// A handle for every grammar, in engine enumeration order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Grammar<'_, E>> + '_ {
        self.index.iter().map(move |name| Grammar {
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

    /// Whether newline-preserving grammar variants were loaded
    pub fn newline_variants(&self) -> bool {
        self.newline_variants
    }

    /// Hand the collection back to the engine
    ///
    /// Consumes the registry; handles borrowed from it must be gone first.
    pub fn release(self) {
        tracing::debug!("Releasing grammar registry ({} grammars)", self.index.len());
        self.engine.release_grammars(self.grammars);
    }

    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    pub(crate) fn collection(&self) -> &E::Grammars {
        &self.grammars
    }
}

impl<E: HighlightEngine> fmt::Debug for GrammarRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarRegistry")
            .field("grammars", &self.index.len())
            .field("newline_variants", &self.newline_variants)
            .finish()
    }
}

/// Named reference to one grammar of a registry
pub struct Grammar<'r, E: HighlightEngine = SyntectEngine> {
    registry: &'r GrammarRegistry<E>,
    name: &'r str,
}

impl<'r, E: HighlightEngine> Grammar<'r, E> {
    pub fn name(&self) -> &'r str {
        self.name
    }

    pub fn registry(&self) -> &'r GrammarRegistry<E> {
        self.registry
    }

    /// Highlight `text` to inline-styled HTML with the default buffer policy
    pub fn highlight_to_html(&self, text: &str, theme: Theme<'_, E>) -> Result<String> {
        Highlighter::default().highlight_to_markup(text, *self, theme, OutputFormat::Html)
    }
}

impl<E: HighlightEngine> Clone for Grammar<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: HighlightEngine> Copy for Grammar<'_, E> {}

impl<E: HighlightEngine> PartialEq for Grammar<'_, E> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.registry, other.registry) && self.name == other.name
    }
}

impl<E: HighlightEngine> Eq for Grammar<'_, E> {}

impl<E: HighlightEngine> Hash for Grammar<'_, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self.registry, state);
        self.name.hash(state);
    }
}

impl<E: HighlightEngine> fmt::Debug for Grammar<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Grammar").field(&self.name).finish()
    }
}
