//! Fragment extraction from a sanitized document
//!
//! Selects the configured fragment (falling back to `body`), serializes it
//! according to the [`ExtractMode`], decodes character references and
//! collapses whitespace runs.

use crate::config::ExtractMode;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

/// Selector used when the configured one is empty, invalid or matches nothing
pub const FALLBACK_SELECTOR: &str = "body";

/// Extracts a normalized text fragment from a sanitized document
///
/// Selector problems never fail extraction; they fall back to `body`. A
/// document with no usable body yields an empty string.
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use sumi_gather::content::extract_fragment;
/// use sumi_gather::ExtractMode;
///
/// let document = Html::parse_document("<body><main>Hello\n\n  World</main></body>");
/// assert_eq!(extract_fragment(&document, "main", ExtractMode::Text), "Hello World");
/// assert_eq!(extract_fragment(&document, ".missing", ExtractMode::Text), "Hello World");
/// ```
pub fn extract_fragment(document: &Html, selector: &str, mode: ExtractMode) -> String {
    let raw = select_with_fallback(document, selector, mode);

    let decoded = match mode {
        // Text nodes already had their character references decoded by the parser
        ExtractMode::Text => raw,
        ExtractMode::Html => decode_entities(&raw),
    };

    let fragment = normalize_whitespace(&decoded);
    if fragment.is_empty() {
        tracing::debug!(
            "Extraction with selector '{}' produced an empty fragment",
            selector
        );
    }

    fragment
}

/// Serializes the configured selection, or the body when that yields nothing
fn select_with_fallback(document: &Html, selector: &str, mode: ExtractMode) -> String {
    let selector = selector.trim();

    if !selector.is_empty() {
        match Selector::parse(selector) {
            Ok(parsed) => match serialize_matches(document, &parsed, mode) {
                Some(content) if !content.trim().is_empty() => return content,
                _ => tracing::debug!(
                    "Selector '{}' matched no content, falling back to {}",
                    selector,
                    FALLBACK_SELECTOR
                ),
            },
            Err(e) => tracing::debug!(
                "Invalid selector '{}' ({:?}), falling back to {}",
                selector,
                e,
                FALLBACK_SELECTOR
            ),
        }
    }

    Selector::parse(FALLBACK_SELECTOR)
        .ok()
        .and_then(|body| serialize_matches(document, &body, mode))
        .unwrap_or_default()
}

/// Serializes the elements matched by `selector`
///
/// Returns `None` when nothing matches. Text mode concatenates the text of
/// every match; HTML mode takes the inner markup of the first match.
fn serialize_matches(document: &Html, selector: &Selector, mode: ExtractMode) -> Option<String> {
    let mut matches = document.select(selector).peekable();
    matches.peek()?;

    let content = match mode {
        ExtractMode::Text => matches
            .map(|element| element.text().collect::<String>())
            .collect(),
        ExtractMode::Html => matches
            .next()
            .map(|element| element.inner_html())
            .unwrap_or_default(),
    };

    Some(content)
}

/// Decodes HTML character references (`&amp;`, `&#39;`, `&nbsp;`, ...)
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Collapses every run of two or more whitespace characters into one space and trims
///
/// A single whitespace character (including a lone newline) is left as is.
pub fn normalize_whitespace(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\s{2,}").expect("whitespace regex is valid"));

    re.replace_all(text, " ").trim().to_string()
}
