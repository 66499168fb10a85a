//! HTML parsing support.
//!
//! Maps a `scraper` tree onto the [`Node`] structure the converter consumes.
//! Elements, attributes and text are kept; comments, doctypes and processing
//! instructions are dropped.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Parse an HTML fragment into a Node tree.
///
/// The returned node is the `html` element wrapping the fragment's nodes.
///
/// # Example
///
/// ```rust
/// use html2md::{parse_html, Converter};
///
/// let node = parse_html("<h1>Hello <em>World</em></h1>");
///
/// let markdown = Converter::new().convert(&node).unwrap();
/// assert_eq!(markdown, "# Hello World");
/// ```
pub fn parse_html(html: &str) -> Node {
    let fragment = Html::parse_fragment(html);
    element_to_node(fragment.root_element())
}

/// Parse a complete HTML document into a document node holding the `html`
/// element
pub fn parse_document(html: &str) -> Node {
    let document = Html::parse_document(html);
    Node::document().with_child(element_to_node(document.root_element()))
}

fn element_to_node(element: ElementRef<'_>) -> Node {
    let mut node = Node::element(element.value().name());
    for (name, value) in element.value().attrs() {
        node.set_attr(name, value);
    }

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => node.add_child(Node::text(&text.text)),
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(element_to_node(child_element));
                }
            }
            _ => {}
        }
    }

    node
}
