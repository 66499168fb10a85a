//! Markdown element model
//!
//! Elements are the output of the conversion rules. Block-level elements are
//! separated by blank lines when rendered inside a [`Document`](crate::Document);
//! inline elements compose within a single block's text.

use crate::options::Options;
use crate::{Error, Result};

/// ATX heading level, always within `1..=6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Validate a heading level
    pub fn new(level: u8) -> Result<Self> {
        if (1..=6).contains(&level) {
            Ok(Self(level))
        } else {
            Err(Error::InvalidArgument {
                argument: "level",
                reason: format!("heading level must be within 1 and 6, got {level}"),
            })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

/// A Markdown element
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// ATX heading. The text is rendered verbatim on a single line.
    Heading { level: HeadingLevel, text: String },

    /// Paragraph containing inline content
    Paragraph(Vec<Element>),

    /// Block quote containing nested blocks
    BlockQuote(Vec<Element>),

    /// List (ordered or unordered)
    List {
        ordered: bool,
        start: u32,
        items: Vec<ListItem>,
    },

    /// Fenced code block, content is never escaped
    CodeBlock {
        language: Option<String>,
        code: String,
    },

    /// Thematic break (horizontal rule)
    ThematicBreak,

    /// Plain text, Markdown-significant characters are escaped on render
    Text(String),

    /// Emphasis (italic)
    Emphasis(Vec<Element>),

    /// Strong emphasis (bold)
    Strong(Vec<Element>),

    /// Code span
    Code(String),

    /// Link with text, target and optional title
    Link {
        content: Vec<Element>,
        url: String,
        title: Option<String>,
    },

    /// Image with alt text, source and optional title
    Image {
        alt: String,
        url: String,
        title: Option<String>,
    },

    /// Hard line break
    LineBreak,
}

/// A list item containing inline runs, paragraphs or nested lists
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    pub content: Vec<Element>,
}

impl ListItem {
    pub fn new(content: Vec<Element>) -> Self {
        Self { content }
    }

    pub fn from_inlines(inlines: Vec<Element>) -> Self {
        Self {
            content: vec![Element::Paragraph(inlines)],
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.iter().all(|e| e.is_blank())
    }
}

impl Element {
    /// Create a heading, failing when `level` is outside `1..=6`
    pub fn heading(level: u8, text: impl Into<String>) -> Result<Self> {
        Ok(Element::Heading {
            level: HeadingLevel::new(level)?,
            text: text.into(),
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Element::Text(text.into())
    }

    pub fn link(content: Vec<Element>, url: impl Into<String>) -> Self {
        Element::Link {
            content,
            url: url.into(),
            title: None,
        }
    }

    pub fn image(alt: impl Into<String>, url: impl Into<String>) -> Self {
        Element::Image {
            alt: alt.into(),
            url: url.into(),
            title: None,
        }
    }

    pub fn code_block(language: Option<&str>, code: impl Into<String>) -> Self {
        Element::CodeBlock {
            language: language.map(str::to_string),
            code: code.into(),
        }
    }

    pub fn list(ordered: bool, items: Vec<ListItem>) -> Self {
        Element::List {
            ordered,
            start: 1,
            items,
        }
    }

    /// Check if this element is block-level
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Element::Heading { .. }
                | Element::Paragraph(_)
                | Element::BlockQuote(_)
                | Element::List { .. }
                | Element::CodeBlock { .. }
                | Element::ThematicBreak
        )
    }

    /// Check if this element carries no visible content
    pub fn is_blank(&self) -> bool {
        match self {
            Element::Heading { .. } | Element::ThematicBreak | Element::LineBreak => false,
            Element::Paragraph(inlines)
            | Element::BlockQuote(inlines)
            | Element::Emphasis(inlines)
            | Element::Strong(inlines) => inlines.iter().all(|i| i.is_blank()),
            Element::List { items, .. } => items.iter().all(|i| i.is_blank()),
            Element::CodeBlock { code, .. } => code.trim().is_empty(),
            Element::Text(text) => text.trim().is_empty(),
            Element::Code(code) => code.is_empty(),
            Element::Link { content, url, .. } => {
                url.is_empty() && content.iter().all(|i| i.is_blank())
            }
            Element::Image { alt, url, .. } => alt.is_empty() && url.is_empty(),
        }
    }

    /// Turn this element into inline content.
    ///
    /// Block elements give up their inline content; inline elements are
    /// returned unchanged.
    pub fn into_inlines(self) -> Vec<Element> {
        match self {
            Element::Heading { text, .. } => vec![Element::Text(text)],
            Element::Paragraph(inlines) => inlines,
            Element::BlockQuote(blocks) => flatten_inlines(blocks),
            Element::List { items, .. } => {
                flatten_inlines(items.into_iter().flat_map(|i| i.content).collect())
            }
            Element::CodeBlock { code, .. } => vec![Element::Code(code)],
            Element::ThematicBreak => Vec::new(),
            inline => vec![inline],
        }
    }

    /// Render with default options
    pub fn render(&self) -> String {
        crate::serialize::render(self, &Options::default())
    }

    pub fn render_with(&self, options: &Options) -> String {
        crate::serialize::render(self, options)
    }
}

/// Flatten a mixed sequence into inline content, keeping a space between
/// the content of neighbouring blocks.
pub fn flatten_inlines(elements: Vec<Element>) -> Vec<Element> {
    let mut inlines = Vec::with_capacity(elements.len());
    let mut after_block = false;

    for element in elements {
        let is_block = element.is_block();
        let flattened = element.into_inlines();
        if flattened.is_empty() {
            continue;
        }
        if (is_block || after_block) && !inlines.is_empty() {
            inlines.push(Element::Text(" ".to_string()));
        }
        inlines.extend(flattened);
        after_block = is_block;
    }

    inlines
}

fn is_html_space(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// Join adjacent text elements.
///
/// A space doubled at the seam of two texts is collapsed; empty texts are dropped.
pub fn merge_text(inlines: Vec<Element>) -> Vec<Element> {
    let mut merged: Vec<Element> = Vec::with_capacity(inlines.len());

    for inline in inlines {
        if let Element::Text(next) = &inline {
            if next.is_empty() {
                continue;
            }
            if let Some(Element::Text(prev)) = merged.last_mut() {
                let next = if prev.ends_with(' ') {
                    next.strip_prefix(' ').unwrap_or(next)
                } else {
                    next.as_str()
                };
                prev.push_str(next);
                continue;
            }
        }
        merged.push(inline);
    }

    merged
}

/// Merge text and trim whitespace at the edges of an inline run and around
/// hard line breaks. Leading and trailing line breaks are removed.
pub fn trim_inlines(inlines: Vec<Element>) -> Vec<Element> {
    let mut inlines = merge_text(inlines);
    let len = inlines.len();

    for i in 0..len {
        let after_break = i == 0 || matches!(inlines[i - 1], Element::LineBreak);
        let before_break = i + 1 == len || matches!(inlines[i + 1], Element::LineBreak);
        if let Element::Text(text) = &mut inlines[i] {
            if after_break {
                *text = text.trim_start_matches(is_html_space).to_string();
            }
            if before_break {
                *text = text.trim_end_matches(is_html_space).to_string();
            }
        }
    }

    inlines.retain(|e| !matches!(e, Element::Text(t) if t.is_empty()));
    while matches!(inlines.first(), Some(Element::LineBreak)) {
        inlines.remove(0);
    }
    while matches!(inlines.last(), Some(Element::LineBreak)) {
        inlines.pop();
    }

    inlines
}

/// Wrap every run of inline elements into a paragraph, dropping blank runs.
/// Block elements pass through in order.
pub fn group_inlines(elements: Vec<Element>) -> Vec<Element> {
    let mut grouped = Vec::with_capacity(elements.len());
    let mut run = Vec::new();

    for element in elements {
        if element.is_block() {
            flush_run(&mut run, &mut grouped);
            grouped.push(element);
        } else {
            run.push(element);
        }
    }
    flush_run(&mut run, &mut grouped);

    grouped
}

fn flush_run(run: &mut Vec<Element>, out: &mut Vec<Element>) {
    if run.is_empty() {
        return;
    }
    let inlines = trim_inlines(std::mem::take(run));
    if !inlines.iter().all(|i| i.is_blank()) {
        out.push(Element::Paragraph(inlines));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Element {
        Element::text(s)
    }

    #[test]
    fn test_heading_level_domain() {
        for level in 1..=6 {
            assert_eq!(HeadingLevel::new(level).unwrap().get(), level);
        }
        assert!(matches!(
            Element::heading(0, "x"),
            Err(Error::InvalidArgument { argument: "level", .. })
        ));
        assert!(matches!(
            Element::heading(7, "x"),
            Err(Error::InvalidArgument { argument: "level", .. })
        ));
        assert!(HeadingLevel::try_from(9).is_err());
    }

    #[test]
    fn test_is_block() {
        assert!(Element::ThematicBreak.is_block());
        assert!(Element::Paragraph(vec![]).is_block());
        assert!(!text("a").is_block());
        assert!(!Element::LineBreak.is_block());
    }

    #[test]
    fn test_merge_text_collapses_seam() {
        let merged = merge_text(vec![text("Hello "), text(" world"), text("")]);
        assert_eq!(merged, vec![text("Hello world")]);
    }

    #[test]
    fn test_trim_inlines() {
        let trimmed = trim_inlines(vec![
            Element::LineBreak,
            text("  a "),
            Element::LineBreak,
            text(" b"),
            Element::Emphasis(vec![text("c")]),
            text("  "),
        ]);
        assert_eq!(
            trimmed,
            vec![
                text("a"),
                Element::LineBreak,
                text("b"),
                Element::Emphasis(vec![text("c")]),
            ]
        );
    }

    #[test]
    fn test_group_inlines() {
        let heading = Element::heading(3, "Title").unwrap();
        let grouped = group_inlines(vec![
            text(" "),
            heading.clone(),
            text(" hi "),
            Element::Strong(vec![text("there")]),
            text("\n"),
        ]);
        assert_eq!(
            grouped,
            vec![
                heading,
                Element::Paragraph(vec![text("hi "), Element::Strong(vec![text("there")])]),
            ]
        );
    }

    #[test]
    fn test_into_inlines_separates_blocks() {
        let quote = Element::BlockQuote(vec![
            Element::Paragraph(vec![text("a")]),
            Element::Paragraph(vec![text("b")]),
        ]);
        assert_eq!(
            quote.into_inlines(),
            vec![text("a"), text(" "), text("b")]
        );
        assert!(Element::ThematicBreak.into_inlines().is_empty());
    }

    #[test]
    fn test_blank() {
        assert!(Element::Paragraph(vec![text("  ")]).is_blank());
        assert!(!Element::heading(1, "").unwrap().is_blank());
        assert!(Element::link(vec![], "").is_blank());
        assert!(!Element::link(vec![], "https://example.com").is_blank());
    }
}
