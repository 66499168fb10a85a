//! Markdown document

use crate::element::Element;
use crate::options::Options;
use crate::serialize::render_blocks;

/// An ordered sequence of top-level Markdown elements.
///
/// Element order is the order of insertion. Rendering never mutates the
/// document, so a built document can be rendered repeatedly or shared
/// across threads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element to the end of the document
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Render with default options.
    ///
    /// Elements are joined by exactly one blank line, with no trailing blank
    /// line. An empty document renders to an empty string.
    pub fn render(&self) -> String {
        self.render_with(&Options::default())
    }

    pub fn render_with(&self, options: &Options) -> String {
        render_blocks(&self.elements, options)
    }
}

impl From<Vec<Element>> for Document {
    fn from(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

impl FromIterator<Element> for Document {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl Extend<Element> for Document {
    fn extend<I: IntoIterator<Item = Element>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(s: &str) -> Element {
        Element::Paragraph(vec![Element::text(s)])
    }

    #[test]
    fn test_empty_document() {
        let document = Document::new();
        assert!(document.is_empty());
        assert_eq!(document.render(), "");
    }

    #[test]
    fn test_block_separation() {
        let mut document = Document::new();
        document.push(paragraph("paragraph1text"));
        document.push(paragraph("paragraph2text"));
        assert_eq!(document.render(), "paragraph1text\n\nparagraph2text");
    }

    #[test]
    fn test_order_is_preserved() {
        let document: Document = vec![
            paragraph("b"),
            Element::heading(1, "a").unwrap(),
            Element::ThematicBreak,
        ]
        .into_iter()
        .collect();
        assert_eq!(document.len(), 3);
        assert_eq!(document.render(), "b\n\n# a\n\n---");
    }

    #[test]
    fn test_render_is_idempotent() {
        let document = Document::from(vec![
            Element::heading(2, "Title").unwrap(),
            paragraph("Body *text*"),
        ]);
        let first = document.render();
        assert_eq!(first, document.render());
        assert_eq!(first, document.to_string());
        assert!(!first.ends_with('\n'));
    }

    #[test]
    fn test_empty_elements_do_not_double_separators() {
        let document = Document::from(vec![
            paragraph("a"),
            Element::Paragraph(vec![]),
            paragraph("b"),
        ]);
        assert_eq!(document.render(), "a\n\nb");
    }
}
