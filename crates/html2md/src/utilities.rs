//! Utility functions and constants for HTML processing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas",
    "center", "dd", "dir", "div", "dl", "dt", "fieldset", "figcaption",
    "figure", "footer", "form", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "html", "isindex", "li", "main", "menu",
    "nav", "noframes", "noscript", "ol", "output", "p", "pre", "section",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

static LANGUAGE_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)lang(?:uage)?-([^\s]+)").expect("LANGUAGE_CLASS: hardcoded regex is valid")
});

static TAG_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_:-]*$").expect("TAG_NAME: hardcoded regex is valid")
});

/// Check if a tag is a block-level element
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

/// Check if a tag is a void element
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

/// Check that a tag name is well formed
pub(crate) fn is_valid_tag_name(tag: &str) -> bool {
    TAG_NAME.is_match(tag)
}

/// Collapse runs of HTML whitespace into a single space.
///
/// Only ASCII whitespace collapses; non-breaking spaces are content.
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;

    for c in s.chars() {
        if c.is_ascii_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}

/// Extract a code language from a `language-x` or `lang-x` class list
pub(crate) fn language_from_class(class: &str) -> Option<&str> {
    LANGUAGE_CLASS
        .captures(class)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Clean an attribute value (trim and handle empty)
pub(crate) fn clean_attribute(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}
