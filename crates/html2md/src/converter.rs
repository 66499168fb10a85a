//! Converter - the main entry point for HTML to Markdown conversion.

use html2md_core::{flatten_inlines, group_inlines, merge_text, Document, Element};
use tracing::{debug, trace};

use crate::node::{Node, NodeRef, NodeType};
use crate::rules::Rules;
use crate::utilities::{is_valid_tag_name, is_void};
use crate::{ConvertError, Result};

/// Markdown rendering options
pub use html2md_core::Options as RenderOptions;

/// Options for [`Converter`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Deepest node, counted from the conversion root, the walk will visit.
    /// `None` leaves depth bounded only by the input tree.
    pub max_depth: Option<usize>,

    /// Options used by [`Converter::convert`] when rendering
    pub render: RenderOptions,
}

/// Walks an HTML node tree and dispatches every node to the first rule that
/// supports it.
///
/// A converter holds no per-conversion state, so one instance can convert
/// any number of trees, from any number of threads.
#[derive(Debug, Clone)]
pub struct Converter {
    rules: Rules,
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with the CommonMark rules and default options
    pub fn new() -> Self {
        Self::with_rules(Rules::commonmark())
    }

    /// Create a converter with no rules registered.
    ///
    /// Every conversion fails with a configuration error until a rule that
    /// supports all nodes is added.
    pub fn empty() -> Self {
        Self::with_rules(Rules::new())
    }

    /// Create a converter with a custom rule set
    pub fn with_rules(rules: Rules) -> Self {
        Self {
            rules,
            options: ConvertOptions::default(),
        }
    }

    /// Replace the options, builder style
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Get mutable access to the rule registry
    pub fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }

    /// Get the current options
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut ConvertOptions {
        &mut self.options
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Convert a node tree and render it to Markdown
    pub fn convert(&self, root: &Node) -> Result<String> {
        let document = self.convert_document(root)?;
        Ok(document.render_with(&self.options.render))
    }

    /// Parse an HTML fragment and render it to Markdown
    #[cfg(feature = "html")]
    pub fn convert_html(&self, html: &str) -> Result<String> {
        self.convert(&crate::html::parse_html(html))
    }

    /// Convert a node tree into a Markdown document.
    ///
    /// Document and fragment roots contribute their children; any other
    /// root is converted itself. Inline results at the top level are grouped
    /// into paragraphs.
    pub fn convert_document(&self, root: &Node) -> Result<Document> {
        debug!(
            rules = self.rules.len(),
            root = %root.node_name,
            "converting document"
        );

        let root = NodeRef::new(root);
        let elements = if root.node.is_root() {
            self.convert_children(&root)?
        } else {
            self.convert_node(&root)?
        };

        Ok(Document::from(group_inlines(elements)))
    }

    /// Convert one node with the first rule that supports it
    pub fn convert_node(&self, node: &NodeRef<'_>) -> Result<Vec<Element>> {
        self.check_node(node)?;

        if let Some(limit) = self.options.max_depth {
            if node.depth() > limit {
                return Err(ConvertError::DepthLimitExceeded {
                    limit,
                    path: node.path(),
                });
            }
        }

        let Some(rule) = self.rules.for_node(node) else {
            return Err(ConvertError::Configuration { path: node.path() });
        };
        trace!(rule = rule.name(), path = %node.path(), "dispatch");

        rule.convert(node, self).map_err(|err| match err {
            ConvertError::InvalidArgument(_) => ConvertError::Rule {
                rule: rule.name().to_string(),
                path: node.path(),
                source: Box::new(err),
            },
            other => other,
        })
    }

    /// Convert every child of a node, concatenating the results in order
    pub fn convert_children(&self, node: &NodeRef<'_>) -> Result<Vec<Element>> {
        let mut elements = Vec::new();
        for child in node.children() {
            elements.extend(self.convert_node(&child)?);
        }
        Ok(elements)
    }

    /// Convert the children of a node into inline content.
    ///
    /// Block results are flattened into their inline content and adjacent
    /// text is merged.
    pub fn convert_inlines(&self, node: &NodeRef<'_>) -> Result<Vec<Element>> {
        let children = self.convert_children(node)?;
        Ok(merge_text(flatten_inlines(children)))
    }

    /// Convert the children of a node into block content, wrapping inline
    /// runs into paragraphs
    pub fn convert_blocks(&self, node: &NodeRef<'_>) -> Result<Vec<Element>> {
        Ok(group_inlines(self.convert_children(node)?))
    }

    fn check_node(&self, node: &NodeRef<'_>) -> Result<()> {
        let n = node.node;
        match n.node_type {
            NodeType::Text | NodeType::Comment => {
                if !n.children.is_empty() {
                    return Err(ConvertError::malformed(node, "character data node has children"));
                }
                if !n.attributes.is_empty() {
                    return Err(ConvertError::malformed(node, "character data node has attributes"));
                }
                if n.is_text() && n.node_value.is_none() {
                    return Err(ConvertError::malformed(node, "text node without a value"));
                }
            }
            NodeType::Element => {
                if !is_valid_tag_name(&n.node_name) {
                    return Err(ConvertError::malformed(
                        node,
                        format!("invalid tag name `{}`", n.node_name),
                    ));
                }
                if is_void(&n.node_name) && !n.children.is_empty() {
                    return Err(ConvertError::malformed(node, "void element has children"));
                }
            }
            NodeType::Document | NodeType::DocumentFragment => {
                if node.parent().is_some() {
                    return Err(ConvertError::malformed(node, "nested document node"));
                }
            }
        }
        Ok(())
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}
