//! Syntax highlighting for fenced code via syntect.
//!
//! Highlighting emits class-annotated spans (no inline colors), so the site
//! stylesheet controls the palette. Unknown languages and parse failures
//! return `None` and the caller falls back to escaped plain text.

use std::sync::OnceLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Highlight `source` as `language`, returning class-annotated HTML.
///
/// `None` means the language is unknown or highlighting failed; the fence
/// should be rendered as plain escaped text instead.
pub fn highlight(language: &str, source: &str) -> Option<String> {
    let set = syntax_set();
    let syntax = set.find_syntax_by_token(language)?;

    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, set, ClassStyle::Spaced);
    for line in LinesWithEndings::from(source) {
        if let Err(error) = generator.parse_html_for_line_which_includes_newline(line) {
            tracing::warn!(language, %error, "syntax highlighting failed, using plain text");
            return None;
        }
    }
    Some(generator.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust_produces_classed_spans() {
        let html = highlight("rust", "fn main() {}").expect("rust is a bundled syntax");
        assert!(html.contains("<span"));
        assert!(html.contains("class="));
        // Class style is Spaced: no inline style attributes.
        assert!(!html.contains("style="));
    }

    #[test]
    fn test_highlight_unknown_language() {
        assert_eq!(highlight("no-such-language-xyz", "text"), None);
    }

    #[test]
    fn test_highlight_empty_source() {
        assert!(highlight("rust", "").is_some());
    }
}
