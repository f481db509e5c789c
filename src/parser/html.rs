//! Shared helpers for page parsing: static patterns and element text.

use regex::Regex;
use scraper::{ElementRef, Selector};

/// Compiles a regex at static init; panics on invalid pattern.
pub(crate) fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Compiles a CSS selector at static init; panics on invalid selector.
pub(crate) fn compile_static_selector(selector: &str) -> Selector {
    Selector::parse(selector)
        .unwrap_or_else(|e| panic!("invalid static selector '{selector}': {e:?}"))
}

/// Returns the element's text with whitespace runs collapsed to one space.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Collapses whitespace runs to single spaces and trims both ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
