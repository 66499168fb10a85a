//! Rule and Filter types for HTML conversion.

use html2md_core::Element;
use regex::Regex;

use crate::converter::Converter;
use crate::node::{NodeRef, NodeType};
use crate::Result;

/// A unit of conversion: decides whether it applies to a node and, if so,
/// produces the node's Markdown.
///
/// Rules hold no per-conversion state. `convert` receives the [`Converter`]
/// driving the walk and calls back into it for the node's children.
pub trait ConvertRule: Send + Sync {
    /// Name used as the registry key and in error messages
    fn name(&self) -> &str;

    /// Check if this rule applies to a node. Must not fail.
    fn supports(&self, node: &NodeRef<'_>) -> bool;

    /// Convert a supported node into zero or more elements
    fn convert(&self, node: &NodeRef<'_>, converter: &Converter) -> Result<Vec<Element>>;
}

/// Type alias for replacement functions
pub type ReplacementFn =
    Box<dyn Fn(&NodeRef<'_>, &Converter) -> Result<Vec<Element>> + Send + Sync>;

/// Type alias for filter predicates
pub type PredicateFn = Box<dyn Fn(&NodeRef<'_>) -> bool + Send + Sync>;

/// A filter determines which nodes a rule applies to
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match element tag names against a pattern
    Pattern(Regex),
    /// Match every node of a type
    NodeType(NodeType),
    /// Match using a predicate function
    Predicate(PredicateFn),
    /// Match every node
    Any,
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&NodeRef<'_>) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches a node
    pub fn matches(&self, node: &NodeRef<'_>) -> bool {
        match self {
            Filter::TagName(t) => node.is_element() && node.tag_name().eq_ignore_ascii_case(t),
            Filter::TagNames(tags) => {
                node.is_element()
                    && tags.iter().any(|t| node.tag_name().eq_ignore_ascii_case(t))
            }
            Filter::Pattern(pattern) => node.is_element() && pattern.is_match(node.tag_name()),
            Filter::NodeType(node_type) => node.node_type() == *node_type,
            Filter::Predicate(f) => f(node),
            Filter::Any => true,
        }
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::TagName(t) => f.debug_tuple("TagName").field(t).finish(),
            Filter::TagNames(t) => f.debug_tuple("TagNames").field(t).finish(),
            Filter::Pattern(p) => f.debug_tuple("Pattern").field(&p.as_str()).finish(),
            Filter::NodeType(t) => f.debug_tuple("NodeType").field(t).finish(),
            Filter::Predicate(_) => f.write_str("Predicate(..)"),
            Filter::Any => f.write_str("Any"),
        }
    }
}

/// A rule built from a [`Filter`] and a replacement closure
pub struct Rule {
    name: String,
    /// Filter to determine which nodes this rule applies to
    pub filter: Filter,
    /// Replacement function that generates Markdown elements
    pub replacement: ReplacementFn,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(name: &str, filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef<'_>, &Converter) -> Result<Vec<Element>> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(&NodeRef<'_>, &Converter) -> Result<Vec<Element>> + Send + Sync + 'static,
    {
        Self::new(tag, Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(name: &str, tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&NodeRef<'_>, &Converter) -> Result<Vec<Element>> + Send + Sync + 'static,
    {
        Self::new(name, Filter::tags(tags), replacement)
    }
}

impl ConvertRule for Rule {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, node: &NodeRef<'_>) -> bool {
        self.filter.matches(node)
    }

    fn convert(&self, node: &NodeRef<'_>, converter: &Converter) -> Result<Vec<Element>> {
        (self.replacement)(node, converter)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_tag_filters_are_case_insensitive() {
        let node = Node::element("EM");
        let node = NodeRef::new(&node);
        assert!(Filter::tag("em").matches(&node));
        assert!(Filter::tag("EM").matches(&node));
        assert!(Filter::tags(&["i", "Em"]).matches(&node));
        assert!(!Filter::tag("strong").matches(&node));
    }

    #[test]
    fn test_tag_filters_skip_text() {
        let node = Node::text("em");
        let node = NodeRef::new(&node);
        assert!(!Filter::tag("em").matches(&node));
        assert!(Filter::NodeType(NodeType::Text).matches(&node));
        assert!(Filter::Any.matches(&node));
    }

    #[test]
    fn test_pattern_and_predicate() {
        let node = Node::element_with_attrs("x-card", vec![("data-kind", "note")]);
        let node = NodeRef::new(&node);
        let pattern = Filter::Pattern(Regex::new("^x-").unwrap());
        let predicate = Filter::predicate(|n| n.attr("data-kind") == Some("note"));
        assert!(pattern.matches(&node));
        assert!(predicate.matches(&node));
    }

    #[test]
    fn test_rule_delegates() {
        let rule = Rule::for_tag("kbd", |node, _| {
            Ok(vec![Element::Code(node.text_content())])
        });
        let kbd = Node::element("kbd").with_child(Node::text("Ctrl"));
        let kbd = NodeRef::new(&kbd);
        let converter = Converter::empty();

        assert_eq!(rule.name(), "kbd");
        assert!(rule.supports(&kbd));
        assert_eq!(
            rule.convert(&kbd, &converter).unwrap(),
            vec![Element::Code("Ctrl".to_string())]
        );
    }
}
