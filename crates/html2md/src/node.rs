//! HTML node structure consumed by the converter.
//!
//! This module provides a DOM node structure modelled on the DOM `Node`
//! interface (node type, name, value, attributes, children). Any parser
//! (html5ever, scraper, a browser DOM, etc.) can convert its output to this structure.
//! The converter only ever reads it.

use indexmap::IndexMap;

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

impl TryFrom<u32> for NodeType {
    /// The unsupported nodeType value
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NodeType::Element),
            3 => Ok(NodeType::Text),
            8 => Ok(NodeType::Comment),
            9 => Ok(NodeType::Document),
            11 => Ok(NodeType::DocumentFragment),
            other => Err(other),
        }
    }
}

/// A DOM node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node type (1 = Element, 3 = Text, etc.)
    pub node_type: NodeType,

    /// Node name (lowercase tag name for elements, "#text" for text nodes)
    pub node_name: String,

    /// Text content for text and comment nodes
    pub node_value: Option<String>,

    /// Attributes in source order, names lowercase
    pub attributes: IndexMap<String, String>,

    /// Child nodes
    pub children: Vec<Node>,
}

impl Node {
    fn new(node_type: NodeType, node_name: &str, node_value: Option<&str>) -> Self {
        Self {
            node_type,
            node_name: node_name.to_string(),
            node_value: node_value.map(str::to_string),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self::new(NodeType::Element, &tag_name.to_ascii_lowercase(), None)
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        for (name, value) in attrs {
            node.set_attr(name, value);
        }
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::new(NodeType::Text, "#text", Some(content))
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Self::new(NodeType::Comment, "#comment", Some(content))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::new(NodeType::Document, "#document", None)
    }

    /// Create a document fragment node
    pub fn document_fragment() -> Self {
        Self::new(NodeType::DocumentFragment, "#document-fragment", None)
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    pub fn is_comment(&self) -> bool {
        self.node_type == NodeType::Comment
    }

    /// Check if this is a document or document fragment node
    pub fn is_root(&self) -> bool {
        matches!(
            self.node_type,
            NodeType::Document | NodeType::DocumentFragment
        )
    }

    /// Get the tag name, empty for anything but elements
    pub fn tag_name(&self) -> &str {
        if self.is_element() {
            &self.node_name
        } else {
            ""
        }
    }

    /// Get an attribute value by name (case-insensitive)
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .or_else(|| self.attributes.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Add a child node, builder style
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.node_value.as_deref().unwrap_or_default()),
            NodeType::Comment => {}
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// A reference to a node with its ancestry.
///
/// The converter hands rules a `NodeRef` so `supports` can look at the
/// parent chain without the tree storing parent pointers.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    /// The node itself
    pub node: &'a Node,
    parent: Option<&'a NodeRef<'a>>,
    index: usize,
    depth: usize,
}

impl<'a> NodeRef<'a> {
    /// Create a new NodeRef without parent context
    pub fn new(node: &'a Node) -> Self {
        Self {
            node,
            parent: None,
            index: 0,
            depth: 0,
        }
    }

    /// Create a reference to the `index`th child of this node
    pub fn child<'b>(&'b self, node: &'b Node, index: usize) -> NodeRef<'b> {
        NodeRef {
            node,
            parent: Some(self),
            index,
            depth: self.depth + 1,
        }
    }

    /// Iterate the children of this node with their ancestry attached
    pub fn children<'b>(&'b self) -> impl Iterator<Item = NodeRef<'b>> + 'b {
        let this: &'b NodeRef<'b> = self;
        this.node
            .children
            .iter()
            .enumerate()
            .map(move |(index, child)| this.child(child, index))
    }

    pub fn parent(&self) -> Option<&NodeRef<'a>> {
        self.parent
    }

    /// Get the parent tag name if known
    pub fn parent_tag(&self) -> Option<&str> {
        self.parent.map(|p| p.tag_name())
    }

    /// Iterate ancestors, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = &NodeRef<'a>> {
        std::iter::successors(self.parent, |p| p.parent)
    }

    /// Check if any ancestor element has the given tag
    pub fn has_ancestor(&self, tag: &str) -> bool {
        self.ancestors().any(|a| a.tag_name().eq_ignore_ascii_case(tag))
    }

    /// Position among the parent's children
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of ancestors between this node and the conversion root
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Human-readable location, e.g. `html > body[1] > div[0]`
    pub fn path(&self) -> String {
        let mut segments: Vec<String> = self
            .ancestors()
            .map(|a| a.segment())
            .collect();
        segments.reverse();
        segments.push(self.segment());
        segments.join(" > ")
    }

    fn segment(&self) -> String {
        let name = &self.node.node_name;
        match self.parent {
            Some(_) => format!("{}[{}]", name, self.index),
            None => name.clone(),
        }
    }

    /// Delegate to Node methods
    pub fn is_element(&self) -> bool {
        self.node.is_element()
    }

    pub fn is_text(&self) -> bool {
        self.node.is_text()
    }

    pub fn node_type(&self) -> NodeType {
        self.node.node_type
    }

    pub fn tag_name(&self) -> &'a str {
        self.node.tag_name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.node.has_attr(name)
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_element() {
        let node = Node::element("DIV");
        assert!(node.is_element());
        assert_eq!(node.tag_name(), "div");
        assert_eq!(node.node_name, "div");
    }

    #[test]
    fn test_create_text() {
        let node = Node::text("Hello World");
        assert!(node.is_text());
        assert_eq!(node.tag_name(), "");
        assert_eq!(node.text_content(), "Hello World");
    }

    #[test]
    fn test_node_type_from_u32() {
        assert_eq!(NodeType::try_from(1), Ok(NodeType::Element));
        assert_eq!(NodeType::try_from(11), Ok(NodeType::DocumentFragment));
        assert_eq!(NodeType::try_from(7), Err(7));
    }

    #[test]
    fn test_attributes() {
        let node = Node::element_with_attrs(
            "a",
            vec![("HREF", "https://example.com"), ("title", "Example")],
        );
        assert_eq!(node.attr("href"), Some("https://example.com"));
        assert_eq!(node.attr("Title"), Some("Example"));
        assert_eq!(node.attr("class"), None);
        let names: Vec<&str> = node.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["href", "title"]);
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut node = Node::element("img");
        node.set_attr("src", "a.png");
        node.set_attr("SRC", "b.png");
        assert_eq!(node.attributes.len(), 1);
        assert_eq!(node.attr("src"), Some("b.png"));
    }

    #[test]
    fn test_children() {
        let parent = Node::element("div")
            .with_child(Node::text("Hello"))
            .with_child(Node::element("span"))
            .with_child(Node::text("World"));

        assert_eq!(parent.children().count(), 3);
        assert_eq!(parent.element_children().count(), 1);
    }

    #[test]
    fn test_text_content() {
        let div = Node::element("div")
            .with_child(Node::text("Hello "))
            .with_child(Node::comment("ignored"))
            .with_child(Node::element("span").with_child(Node::text("World")));

        assert_eq!(div.text_content(), "Hello World");
    }

    #[test]
    fn test_node_ref_ancestry() {
        let tree = Node::element("body").with_child(
            Node::element("div")
                .with_child(Node::text(" "))
                .with_child(Node::element("h3")),
        );
        let root = NodeRef::new(&tree);
        let div = root.children().next().unwrap();
        let h3 = div.children().nth(1).unwrap();

        assert_eq!(h3.depth(), 2);
        assert_eq!(h3.index(), 1);
        assert_eq!(h3.parent_tag(), Some("div"));
        assert!(h3.has_ancestor("BODY"));
        assert!(!h3.has_ancestor("pre"));
        assert_eq!(h3.path(), "body > div[0] > h3[1]");
    }
}
