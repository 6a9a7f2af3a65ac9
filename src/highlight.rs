//! Highlight request orchestration
//!
//! Combines text, a grammar handle and a theme handle into one engine render
//! call. Output that does not fit the buffer is retried with a doubled
//! buffer; every other engine failure is translated and returned.
//!
//! ```ignore
//! let grammars = GrammarRegistry::load_default()?;
//! let themes = ThemeRegistry::load_defaults()?;
//!
//! let grammar = grammars.lookup_by_extension("cs")?;
//! let theme = themes.lookup("InspiredGitHub")?;
//! let html = Highlighter::default()
//!     .highlight_to_markup("class X {}", grammar, theme, OutputFormat::Html)?;
//! ```

use crate::config::HighlightConfig;
use crate::engine::{HighlightEngine, OutputFormat, RenderRequest, SyntectEngine};
use crate::error::Result;
use crate::grammar::Grammar;
use crate::marshal::{call_with_growth, translate, BufferPolicy, Subject};
use crate::theme::Theme;

/// One highlight request: text plus the grammar and theme to render it with
pub struct HighlightRequest<'a, 'r, E: HighlightEngine = SyntectEngine> {
    pub text: &'a str,
    pub grammar: Grammar<'r, E>,
    pub theme: Theme<'r, E>,
    pub format: OutputFormat,
}

impl<'a, 'r, E: HighlightEngine> HighlightRequest<'a, 'r, E> {
    /// Request inline-styled HTML
    pub fn new(text: &'a str, grammar: Grammar<'r, E>, theme: Theme<'r, E>) -> Self {
        Self {
            text,
            grammar,
            theme,
            format: OutputFormat::Html,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// Runs highlight requests under a render buffer policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlighter {
    policy: BufferPolicy,
    format: OutputFormat,
}

impl Highlighter {
    pub fn new(policy: BufferPolicy) -> Self {
        Self {
            policy,
            format: OutputFormat::default(),
        }
    }

    /// Buffer policy and default output format from `config`
    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::new(config.buffer).with_format(config.format)
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn policy(&self) -> &BufferPolicy {
        &self.policy
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render `text` in this highlighter's output format
    pub fn highlight_text<E: HighlightEngine>(
        &self,
        text: &str,
        grammar: Grammar<'_, E>,
        theme: Theme<'_, E>,
    ) -> Result<String> {
        self.highlight_to_markup(text, grammar, theme, self.format)
    }

    /// Render `text` with `grammar` and `theme` into `format`
    pub fn highlight_to_markup<E: HighlightEngine>(
        &self,
        text: &str,
        grammar: Grammar<'_, E>,
        theme: Theme<'_, E>,
        format: OutputFormat,
    ) -> Result<String> {
        self.highlight(&HighlightRequest {
            text,
            grammar,
            theme,
            format,
        })
    }

    /// Run one request; the markup is returned exactly as the engine wrote it
    pub fn highlight<E: HighlightEngine>(
        &self,
        request: &HighlightRequest<'_, '_, E>,
    ) -> Result<String> {
        let grammars = request.grammar.registry();
        let engine = grammars.engine();
        let render = RenderRequest {
            text: request.text,
            grammars: grammars.collection(),
            grammar: request.grammar.name(),
            themes: request.theme.registry().collection(),
            theme: request.theme.name(),
            format: request.format,
        };

        tracing::trace!(
            "Highlighting {} bytes as {:?} with {:?} ({:?})",
            request.text.len(),
            render.grammar,
            render.theme,
            render.format
        );

        call_with_growth(&self.policy, |out| engine.render(&render, out)).map_err(|err| {
            translate(
                err,
                Subject::Render {
                    grammar: render.grammar,
                    theme: render.theme,
                },
            )
        })
    }

    /// CSS rules for `theme` matching [`OutputFormat::ClassedHtml`] markup
    pub fn stylesheet<E: HighlightEngine>(&self, theme: Theme<'_, E>) -> Result<String> {
        let registry = theme.registry();
        call_with_growth(&self.policy, |out| {
            registry
                .engine()
                .stylesheet(registry.collection(), theme.name(), out)
        })
        .map_err(|err| translate(err, Subject::Theme { key: theme.name() }))
    }
}
