//! Fixed sanitization pass over a parsed HTML document
//!
//! The pass removes non-content elements and neutralizes links, inline styling
//! and inline event handlers so that only readable content is left for the
//! extractor. The rules live in [`SANITIZE_RULES`] and are applied in order.

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::Element;
use scraper::{Html, Node};

/// A single sanitization rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeRule {
    /// Remove every element with this tag name, including its subtree
    RemoveElement(&'static str),

    /// Strip an attribute, either from one element kind or from all elements
    StripAttribute {
        element: Option<&'static str>,
        attribute: &'static str,
    },

    /// Strip every attribute whose name starts with this prefix
    StripAttributePrefix(&'static str),

    /// Remove all comment nodes, including those directly under the document root
    RemoveComments,
}

/// The sanitization policy, in application order
pub const SANITIZE_RULES: &[SanitizeRule] = &[
    SanitizeRule::RemoveElement("script"),
    SanitizeRule::RemoveElement("style"),
    SanitizeRule::RemoveElement("iframe"),
    SanitizeRule::RemoveElement("input"),
    SanitizeRule::RemoveElement("form"),
    SanitizeRule::RemoveElement("head"),
    SanitizeRule::RemoveElement("footer"),
    SanitizeRule::RemoveElement("nav"),
    SanitizeRule::RemoveElement("img"),
    SanitizeRule::RemoveElement("audio"),
    SanitizeRule::RemoveElement("video"),
    SanitizeRule::StripAttribute {
        element: Some("a"),
        attribute: "href",
    },
    SanitizeRule::StripAttribute {
        element: None,
        attribute: "style",
    },
    SanitizeRule::StripAttributePrefix("on"),
    SanitizeRule::RemoveComments,
];

/// Counts of what a sanitization pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Elements detached (outermost matches only)
    pub elements_removed: usize,

    /// Attributes stripped from surviving elements
    pub attributes_stripped: usize,

    /// Comment nodes detached
    pub comments_removed: usize,
}

impl SanitizeReport {
    /// Returns true if the pass changed nothing
    pub fn is_clean(&self) -> bool {
        self.elements_removed == 0 && self.attributes_stripped == 0 && self.comments_removed == 0
    }
}

/// Applies [`SANITIZE_RULES`] to the document in place
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use sumi_gather::content::sanitize;
///
/// let mut document = Html::parse_document("<body>Hi<script>bad()</script></body>");
/// let report = sanitize(&mut document);
/// assert_eq!(report.elements_removed, 2); // <head> and <script>
/// assert!(!document.html().contains("script"));
/// ```
pub fn sanitize(document: &mut Html) -> SanitizeReport {
    let mut report = SanitizeReport::default();

    for rule in SANITIZE_RULES {
        apply_rule(document, rule, &mut report);
    }

    tracing::trace!(
        "Sanitized document: {} elements, {} attributes, {} comments removed",
        report.elements_removed,
        report.attributes_stripped,
        report.comments_removed
    );

    report
}

/// Applies a single rule, adding its changes to the report
pub fn apply_rule(document: &mut Html, rule: &SanitizeRule, report: &mut SanitizeReport) {
    match *rule {
        SanitizeRule::RemoveElement(tag) => {
            report.elements_removed += detach_where(document, |node| {
                node.as_element().is_some_and(|el| el.name() == tag)
            });
        }
        SanitizeRule::StripAttribute { element, attribute } => {
            report.attributes_stripped += strip_attributes_where(
                document,
                |el| element.map_or(true, |tag| el.name() == tag),
                |name| name == attribute,
            );
        }
        SanitizeRule::StripAttributePrefix(prefix) => {
            report.attributes_stripped +=
                strip_attributes_where(document, |_| true, |name| name.starts_with(prefix));
        }
        SanitizeRule::RemoveComments => {
            report.comments_removed += detach_where(document, Node::is_comment);
        }
    }
}

/// Detaches every node matching the predicate that has no matching ancestor
fn detach_where(document: &mut Html, predicate: impl Fn(&Node) -> bool) -> usize {
    let targets: Vec<_> = document
        .tree
        .root()
        .descendants()
        .filter(|node| predicate(node.value()))
        .filter(|node| !node.ancestors().any(|ancestor| predicate(ancestor.value())))
        .map(|node| node.id())
        .collect();

    for id in &targets {
        if let Some(mut node) = document.tree.get_mut(*id) {
            node.detach();
        }
    }

    targets.len()
}

/// Rebuilds matching elements without the attributes selected by `strip`
fn strip_attributes_where(
    document: &mut Html,
    element_filter: impl Fn(&Element) -> bool,
    strip: impl Fn(&str) -> bool,
) -> usize {
    let targets: Vec<_> = document
        .tree
        .root()
        .descendants()
        .filter(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| element_filter(el) && el.attrs().any(|(name, _)| strip(name)))
        })
        .map(|node| node.id())
        .collect();

    let mut stripped = 0;
    for id in targets {
        let Some(mut node) = document.tree.get_mut(id) else {
            continue;
        };

        let rebuilt = match node.value() {
            Node::Element(el) => {
                let before = el.attrs().count();
                let kept: Vec<Attribute> = el
                    .attrs()
                    .filter(|(name, _)| !strip(name))
                    .map(|(name, value)| Attribute {
                        name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
                        value: StrTendril::from_slice(value),
                    })
                    .collect();
                stripped += before - kept.len();
                Element::new(el.name.clone(), kept)
            }
            _ => continue,
        };

        *node.value() = Node::Element(rebuilt);
    }

    stripped
}
