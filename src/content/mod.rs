//! Content pipeline for fetched pages
//!
//! This module turns a fetched HTML body into a text fragment:
//! - Parsing into a DOM tree
//! - Sanitization with a fixed rule table
//! - Fragment selection, entity decoding and whitespace normalization

mod extract;
mod sanitize;

pub use extract::{decode_entities, extract_fragment, normalize_whitespace, FALLBACK_SELECTOR};
pub use sanitize::{apply_rule, sanitize, SanitizeReport, SanitizeRule, SANITIZE_RULES};

use crate::config::ExtractMode;
use scraper::{Html, Selector};

/// Parses, sanitizes and extracts a fetched page
///
/// # Arguments
///
/// * `url` - The page URL (for logging only)
/// * `body` - The HTML body as fetched
/// * `selector` - The selector for the fragment to extract
/// * `mode` - How the selected fragment is serialized
///
/// # Returns
///
/// The extracted fragment, possibly empty
pub fn process_page(url: &str, body: &str, selector: &str, mode: ExtractMode) -> String {
    let mut document = Html::parse_document(body);

    if let Some(title) = page_title(&document) {
        tracing::debug!("Fetched {} ({})", url, title);
    }

    sanitize(&mut document);
    extract_fragment(&document, selector, mode)
}

/// Extracts the page title from the HTML document
///
/// Must run before sanitization, which removes `<head>`.
pub fn page_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_page_example() {
        let body = "<html><body>Hello <script>bad()</script>World</body></html>";
        assert_eq!(
            process_page("http://a.test", body, "body", ExtractMode::Text),
            "Hello World"
        );
    }

    #[test]
    fn test_process_page_drops_head_and_footer_text() {
        let body = r#"<html><head><title>Title</title></head>
            <body><nav>Home | About</nav><main>Main   text</main><footer>(c) 2024</footer></body></html>"#;
        assert_eq!(
            process_page("http://a.test", body, "body", ExtractMode::Text),
            "Main text"
        );
    }

    #[test]
    fn test_process_page_non_html_body() {
        assert_eq!(
            process_page("http://a.test", "just some text", "body", ExtractMode::Text),
            "just some text"
        );
        assert_eq!(process_page("http://a.test", "", "body", ExtractMode::Text), "");
    }

    #[test]
    fn test_page_title() {
        let document = Html::parse_document("<html><head><title>  Test Page  </title></head></html>");
        assert_eq!(page_title(&document), Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let document = Html::parse_document("<html><head></head><body></body></html>");
        assert_eq!(page_title(&document), None);
    }
}
