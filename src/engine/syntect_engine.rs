//! `syntect` backed engine
//!
//! Uses the syntax definitions and themes bundled with syntect. Both
//! collections are plain owned values; releasing them is a drop.

use ::syntect::highlighting::ThemeSet;
use ::syntect::html::{
    css_for_theme_with_class_style, highlighted_html_for_string, ClassStyle, ClassedHTMLGenerator,
};
use ::syntect::parsing::{SyntaxReference, SyntaxSet};
use ::syntect::util::LinesWithEndings;

use super::{
    write_names, EngineError, EngineResult, EngineStatus, HighlightEngine, OutputBuffer,
    OutputFormat, RenderRequest,
};

/// Class style for [`OutputFormat::ClassedHtml`] and the matching stylesheet
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "tc-" };

/// Loaded syntect grammar collection
pub struct SyntectGrammars {
    set: SyntaxSet,
    newline_variants: bool,
}

impl SyntectGrammars {
    pub fn newline_variants(&self) -> bool {
        self.newline_variants
    }
}

/// Loaded syntect theme collection
pub struct SyntectThemes {
    set: ThemeSet,
}

/// Engine over syntect's bundled defaults
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntectEngine;

fn syntax_not_found(what: &str, key: &str) -> EngineError {
    EngineError::new(
        EngineStatus::SyntaxNotFound,
        format!("no syntax for {} {:?}", what, key),
    )
}

fn write_syntax_name(
    syntax: Option<&SyntaxReference>,
    what: &str,
    key: &str,
    out: &mut OutputBuffer,
) -> EngineResult {
    match syntax {
        Some(syntax) => out.fill(&syntax.name),
        None => Err(syntax_not_found(what, key)),
    }
}

impl SyntectEngine {
    fn render_classed(
        set: &SyntaxSet,
        syntax: &SyntaxReference,
        text: &str,
    ) -> Result<String, EngineError> {
        let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, set, CLASS_STYLE);
        for line in LinesWithEndings::from(text) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| EngineError::general(e.to_string()))?;
        }
        Ok(format!("<pre class=\"tc-code\">{}</pre>\n", generator.finalize()))
    }
}

impl HighlightEngine for SyntectEngine {
    type Grammars = SyntectGrammars;
    type Themes = SyntectThemes;

    fn load_grammars(&self, newline_variants: bool) -> Result<SyntectGrammars, EngineError> {
        let set = if newline_variants {
            SyntaxSet::load_defaults_newlines()
        } else {
            SyntaxSet::load_defaults_nonewlines()
        };
        tracing::debug!(
            "Loaded {} bundled syntaxes (newline variants: {})",
            set.syntaxes().len(),
            newline_variants
        );
        Ok(SyntectGrammars {
            set,
            newline_variants,
        })
    }

    fn grammar_names(&self, grammars: &SyntectGrammars, out: &mut OutputBuffer) -> EngineResult {
        write_names(grammars.set.syntaxes().iter().map(|s| s.name.as_str()), out)
    }

    fn grammar_by_extension(
        &self,
        grammars: &SyntectGrammars,
        ext: &str,
        out: &mut OutputBuffer,
    ) -> EngineResult {
        let syntax = grammars.set.find_syntax_by_extension(ext);
        write_syntax_name(syntax, "extension", ext, out)
    }

    fn grammar_by_first_line(
        &self,
        grammars: &SyntectGrammars,
        line: &str,
        out: &mut OutputBuffer,
    ) -> EngineResult {
        let syntax = grammars.set.find_syntax_by_first_line(line);
        write_syntax_name(syntax, "first line", line, out)
    }

    fn grammar_by_token(
        &self,
        grammars: &SyntectGrammars,
        token: &str,
        out: &mut OutputBuffer,
    ) -> EngineResult {
        let syntax = grammars.set.find_syntax_by_token(token);
        write_syntax_name(syntax, "token", token, out)
    }

    fn load_themes(&self) -> Result<SyntectThemes, EngineError> {
        let set = ThemeSet::load_defaults();
        tracing::debug!("Loaded {} bundled themes", set.themes.len());
        Ok(SyntectThemes { set })
    }

    fn theme_names(&self, themes: &SyntectThemes, out: &mut OutputBuffer) -> EngineResult {
        write_names(themes.set.themes.keys().map(String::as_str), out)
    }

    fn stylesheet(
        &self,
        themes: &SyntectThemes,
        theme: &str,
        out: &mut OutputBuffer,
    ) -> EngineResult {
        let theme = themes.set.themes.get(theme).ok_or_else(|| {
            EngineError::new(EngineStatus::ThemeNotFound, format!("no theme {:?}", theme))
        })?;
        let css = css_for_theme_with_class_style(theme, CLASS_STYLE)
            .map_err(|e| EngineError::general(e.to_string()))?;
        out.fill(&css)
    }

    fn render(&self, request: &RenderRequest<'_, Self>, out: &mut OutputBuffer) -> EngineResult {
        let set = &request.grammars.set;
        let syntax = set
            .find_syntax_by_name(request.grammar)
            .ok_or_else(|| syntax_not_found("name", request.grammar))?;
        let theme = request.themes.set.themes.get(request.theme).ok_or_else(|| {
            EngineError::new(
                EngineStatus::ThemeNotFound,
                format!("no theme {:?}", request.theme),
            )
        })?;

        let markup = match request.format {
            OutputFormat::Html => highlighted_html_for_string(request.text, set, syntax, theme)
                .map_err(|e| EngineError::general(e.to_string()))?,
            OutputFormat::ClassedHtml => Self::render_classed(set, syntax, request.text)?,
        };
        out.fill(&markup)
    }
}
