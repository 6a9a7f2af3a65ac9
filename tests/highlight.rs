//! End-to-end highlight requests through the syntect engine

mod common;

use common::CSHARP_SNIPPET;
use tintcode::{
    shared, BufferPolicy, HighlightConfig, HighlightError, HighlightRequest, Highlighter,
    OutputFormat,
};

#[test]
fn test_end_to_end_csharp_inspired_github() {
    let grammars = shared::grammars().unwrap();
    let themes = shared::themes().unwrap();

    let grammar = grammars.lookup_by_extension("cs").unwrap();
    let theme = themes.lookup("InspiredGitHub").unwrap();

    let html = Highlighter::default()
        .highlight_to_markup("class X {}", grammar, theme, OutputFormat::Html)
        .unwrap();

    assert!(!html.is_empty());
    assert!(html.starts_with("<pre"), "unexpected markup: {}", html);
    assert!(html.contains("<span style="), "unexpected markup: {}", html);
    assert!(html.contains("class"));
}

#[test]
fn test_highlight_is_deterministic() {
    let grammars = shared::grammars().unwrap();
    let themes = shared::themes().unwrap();
    let grammar = grammars.lookup("C#").unwrap();
    let theme = themes.lookup("Solarized (dark)").unwrap();

    let first = grammar.highlight_to_html(CSHARP_SNIPPET, theme).unwrap();
    let second = grammar.highlight_to_html(CSHARP_SNIPPET, theme).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_convenience_matches_request() {
    let grammars = shared::grammars().unwrap();
    let themes = shared::themes().unwrap();
    let grammar = grammars.lookup("Rust").unwrap();
    let theme = themes.lookup("base16-ocean.dark").unwrap();
    let source = "fn main() {\n    println!(\"hi\");\n}\n";

    let via_handle = grammar.highlight_to_html(source, theme).unwrap();
    let via_request = Highlighter::default()
        .highlight(&HighlightRequest::new(source, grammar, theme))
        .unwrap();
    assert_eq!(via_handle, via_request);
}

#[test]
fn test_large_input_is_complete() {
    let grammars = shared::grammars().unwrap();
    let themes = shared::themes().unwrap();
    let grammar = grammars.lookup("C#").unwrap();
    let theme = themes.lookup("InspiredGitHub").unwrap();

    let mut source = String::new();
    for i in 0..2_000 {
        source.push_str(&format!("class Generated{} {{ int field{} = {}; }}\n", i, i, i));
    }

    let highlighter = Highlighter::default();
    let html = highlighter
        .highlight_to_markup(&source, grammar, theme, OutputFormat::Html)
        .unwrap();

    assert!(html.len() > highlighter.policy().initial_capacity);
    assert!(html.contains("Generated1999"));
    assert!(html.trim_end().ends_with("</pre>"));
}

#[test]
fn test_large_input_with_no_growth_fails_loudly() {
    let grammars = shared::grammars().unwrap();
    let themes = shared::themes().unwrap();
    let grammar = grammars.lookup("C#").unwrap();
    let theme = themes.lookup("InspiredGitHub").unwrap();
    let source = CSHARP_SNIPPET.repeat(200);

    let highlighter = Highlighter::new(BufferPolicy {
        initial_capacity: 1024,
        max_doublings: 0,
    });
    let err = highlighter
        .highlight_to_markup(&source, grammar, theme, OutputFormat::Html)
        .unwrap_err();

    assert_eq!(err, HighlightError::BufferTooSmall { capacity: 1024 });
}

#[test]
fn test_classed_html_and_stylesheet() {
    let grammars = shared::grammars().unwrap();
    let themes = shared::themes().unwrap();
    let grammar = grammars.lookup("C#").unwrap();
    let theme = themes.lookup("InspiredGitHub").unwrap();

    let request = HighlightRequest::new(CSHARP_SNIPPET, grammar, theme)
        .with_format(OutputFormat::ClassedHtml);
    let html = Highlighter::default().highlight(&request).unwrap();
    assert!(html.starts_with("<pre class=\"tc-code\">"));
    assert!(html.contains("<span class=\"tc-"));
    assert!(!html.contains("style="));

    let css = theme.stylesheet().unwrap();
    assert!(css.contains(".tc-"));
}

#[test]
fn test_highlighter_from_config() {
    let mut config = HighlightConfig::default();
    config.buffer.initial_capacity = 128;
    config.format = OutputFormat::ClassedHtml;

    let highlighter = Highlighter::from_config(&config);
    assert_eq!(highlighter.policy().initial_capacity, 128);
    assert_eq!(highlighter.format(), OutputFormat::ClassedHtml);

    let grammars = shared::grammars().unwrap();
    let themes = shared::themes().unwrap();
    config.theme = "Not Installed".to_string();
    let theme = themes.configured(&config).unwrap();
    assert_eq!(theme.name(), config.fallback_theme);

    // Small starting buffer still yields the full document
    let html = highlighter
        .highlight_text(CSHARP_SNIPPET, grammars.lookup("C#").unwrap(), theme)
        .unwrap();
    assert!(html.starts_with("<pre class=\"tc-code\">"));
    assert!(html.contains("WriteLine"));
}

#[test]
fn test_stylesheet_uses_highlighter_policy() {
    let themes = shared::themes().unwrap();
    let theme = themes.lookup("InspiredGitHub").unwrap();

    let strict = Highlighter::new(BufferPolicy {
        initial_capacity: 16,
        max_doublings: 0,
    });
    assert_eq!(
        strict.stylesheet(theme).unwrap_err(),
        HighlightError::BufferTooSmall { capacity: 16 }
    );

    let growing = Highlighter::new(BufferPolicy {
        initial_capacity: 16,
        max_doublings: 16,
    });
    assert_eq!(growing.stylesheet(theme).unwrap(), theme.stylesheet().unwrap());
}

#[test]
fn test_large_input_from_small_start_buffer() {
    let grammars = shared::grammars().unwrap();
    let themes = shared::themes().unwrap();
    let grammar = grammars.lookup("C#").unwrap();
    let theme = themes.lookup("InspiredGitHub").unwrap();
    let source = CSHARP_SNIPPET.repeat(500);

    // Far past the start size but inside the limit
    let highlighter = Highlighter::new(BufferPolicy {
        initial_capacity: 1024,
        max_doublings: 20,
    });
    let html = highlighter.highlight_text(&source, grammar, theme).unwrap();
    assert_eq!(html, grammar.highlight_to_html(&source, theme).unwrap());
}
