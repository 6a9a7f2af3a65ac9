//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tintcode::engine::{
    write_names, EngineError, EngineResult, EngineStatus, HighlightEngine, OutputBuffer,
    RenderRequest,
};

pub const CSHARP_SNIPPET: &str = r#"using System;

namespace HelloWorld {
    class Program {
        static void Main(string[] args) {
            Console.WriteLine("Hello World");
        }
    }
}
"#;

/// Names held by a fake collection
pub struct FakeCollection {
    pub names: Vec<String>,
}

/// Scriptable engine that records what the registries ask of it
#[derive(Default)]
pub struct FakeEngine {
    pub grammar_names: Vec<String>,
    pub theme_names: Vec<String>,
    pub extensions: HashMap<String, String>,
    pub fail_load: Option<EngineStatus>,
    pub render_failure: Option<EngineStatus>,
    pub render_calls: AtomicUsize,
    pub released_grammars: AtomicUsize,
    pub released_themes: AtomicUsize,
}

impl FakeEngine {
    pub fn new(grammars: &[&str], themes: &[&str]) -> Self {
        Self {
            grammar_names: grammars.iter().map(|s| s.to_string()).collect(),
            theme_names: themes.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_extension(mut self, ext: &str, grammar: &str) -> Self {
        self.extensions.insert(ext.to_string(), grammar.to_string());
        self
    }

    pub fn render_calls(&self) -> usize {
        self.render_calls.load(Ordering::SeqCst)
    }
}

/// Standard fake with a couple of grammars and themes
pub fn fake_engine() -> Arc<FakeEngine> {
    Arc::new(
        FakeEngine::new(&["Plain Text", "Rust", "C#"], &["Dark", "Light"])
            .with_extension("rs", "Rust")
            .with_extension("cs", "C#"),
    )
}

fn load(names: &[String], failure: Option<EngineStatus>) -> Result<FakeCollection, EngineError> {
    match failure {
        Some(status) => Err(EngineError::new(status, "load failed")),
        None => Ok(FakeCollection {
            names: names.to_vec(),
        }),
    }
}

fn not_found(key: &str) -> EngineError {
    EngineError::new(EngineStatus::SyntaxNotFound, format!("no syntax for {:?}", key))
}

impl HighlightEngine for FakeEngine {
    type Grammars = FakeCollection;
    type Themes = FakeCollection;

    fn load_grammars(&self, _newline_variants: bool) -> Result<FakeCollection, EngineError> {
        load(&self.grammar_names, self.fail_load)
    }

    fn release_grammars(&self, _grammars: FakeCollection) {
        self.released_grammars.fetch_add(1, Ordering::SeqCst);
    }

    fn grammar_names(&self, grammars: &FakeCollection, out: &mut OutputBuffer) -> EngineResult {
        write_names(grammars.names.iter().map(String::as_str), out)
    }

    fn grammar_by_extension(
        &self,
        _grammars: &FakeCollection,
        ext: &str,
        out: &mut OutputBuffer,
    ) -> EngineResult {
        match self.extensions.get(ext) {
            Some(name) => out.fill(name),
            None => Err(not_found(ext)),
        }
    }

    fn grammar_by_first_line(
        &self,
        _grammars: &FakeCollection,
        line: &str,
        out: &mut OutputBuffer,
    ) -> EngineResult {
        if line.starts_with("#!") && line.contains("rust-script") {
            out.fill("Rust")
        } else {
            Err(not_found(line))
        }
    }

    fn grammar_by_token(
        &self,
        grammars: &FakeCollection,
        token: &str,
        out: &mut OutputBuffer,
    ) -> EngineResult {
        match grammars
            .names
            .iter()
            .find(|name| name.eq_ignore_ascii_case(token))
        {
            Some(name) => out.fill(name),
            None => Err(not_found(token)),
        }
    }

    fn load_themes(&self) -> Result<FakeCollection, EngineError> {
        load(&self.theme_names, self.fail_load)
    }

    fn release_themes(&self, _themes: FakeCollection) {
        self.released_themes.fetch_add(1, Ordering::SeqCst);
    }

    fn theme_names(&self, themes: &FakeCollection, out: &mut OutputBuffer) -> EngineResult {
        write_names(themes.names.iter().map(String::as_str), out)
    }

    fn stylesheet(
        &self,
        themes: &FakeCollection,
        theme: &str,
        out: &mut OutputBuffer,
    ) -> EngineResult {
        if !themes.names.iter().any(|name| name == theme) {
            return Err(EngineError::new(EngineStatus::ThemeNotFound, theme));
        }
        out.fill(&format!(".{} {{}}", theme.to_lowercase()))
    }

    fn render(&self, request: &RenderRequest<'_, Self>, out: &mut OutputBuffer) -> EngineResult {
        self.render_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = self.render_failure {
            return Err(EngineError::new(status, "scripted failure"));
        }
        if !request.grammars.names.iter().any(|name| name == request.grammar) {
            return Err(not_found(request.grammar));
        }
        if !request.themes.names.iter().any(|name| name == request.theme) {
            return Err(EngineError::new(EngineStatus::ThemeNotFound, request.theme));
        }

        out.fill(&format!(
            "<pre data-grammar=\"{}\" data-theme=\"{}\">{}</pre>",
            request.grammar, request.theme, request.text
        ))
    }
}
