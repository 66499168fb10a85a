//! Rule system for HTML to Markdown conversion.

mod commonmark;
mod rule;

pub use commonmark::{
    blockquote_rule, code_block_rule, code_span_rule, commonmark_rules, emphasis_rule,
    fallback_rule, header_rule, ignored_rule, image_rule, line_break_rule, link_rule, list_rule,
    paragraph_rule, strong_rule, text_rule, thematic_break_rule,
};
pub use rule::{ConvertRule, Filter, PredicateFn, ReplacementFn, Rule};

use std::sync::Arc;

use indexmap::IndexMap;

use crate::node::NodeRef;

/// Ordered collection of rules.
///
/// Registration order is priority order: [`Rules::for_node`] returns the
/// first rule that supports a node. Rules are keyed by name and shared, so
/// the same rule can sit in several registries.
#[derive(Clone, Default)]
pub struct Rules {
    rules: IndexMap<String, Arc<dyn ConvertRule>>,
}

impl Rules {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the CommonMark rules, ending in the fallback
    pub fn commonmark() -> Self {
        commonmark_rules().into_iter().collect()
    }

    /// Append a rule. Re-adding a name replaces that rule in its current position.
    pub fn add<R: ConvertRule + 'static>(&mut self, rule: R) -> &mut Self {
        self.add_shared(Arc::new(rule))
    }

    /// Append a shared rule
    pub fn add_shared(&mut self, rule: Arc<dyn ConvertRule>) -> &mut Self {
        self.rules.insert(rule.name().to_string(), rule);
        self
    }

    /// Insert a rule right before the rule named `anchor`.
    ///
    /// A rule registered under the same name is moved, not duplicated; naming
    /// the anchor itself replaces it in place. Returns false, leaving the
    /// registry unchanged, when `anchor` is not registered.
    pub fn insert_before<R: ConvertRule + 'static>(&mut self, anchor: &str, rule: R) -> bool {
        if !self.rules.contains_key(anchor) {
            return false;
        }
        let rule: Arc<dyn ConvertRule> = Arc::new(rule);
        let name = rule.name().to_string();
        if name == anchor {
            self.rules.insert(name, rule);
            return true;
        }

        self.rules.shift_remove(&name);
        let Some(index) = self.rules.get_index_of(anchor) else {
            return false;
        };
        self.rules.shift_insert(index, name, rule);
        true
    }

    /// Remove a rule by name
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn ConvertRule>> {
        self.rules.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ConvertRule>> {
        self.rules.get(name)
    }

    /// Rule names in priority order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the first rule that supports a node
    pub fn for_node(&self, node: &NodeRef<'_>) -> Option<&dyn ConvertRule> {
        self.rules
            .values()
            .find(|rule| rule.supports(node))
            .map(|rule| &**rule)
    }
}

impl FromIterator<Rule> for Rules {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut rules = Rules::new();
        for rule in iter {
            rules.add(rule);
        }
        rules
    }
}

impl From<Vec<Rule>> for Rules {
    fn from(rules: Vec<Rule>) -> Self {
        rules.into_iter().collect()
    }
}

impl std::fmt::Debug for Rules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeType};
    use html2md_core::Element;

    fn named(name: &str, tag: &str) -> Rule {
        Rule::new(name, Filter::tag(tag), |_, _| Ok(Vec::new()))
    }

    #[test]
    fn test_commonmark_ends_with_fallback() {
        let rules = Rules::commonmark();
        assert_eq!(rules.names().last(), Some("fallback"));
        assert_eq!(rules.names().next(), Some("ignored"));
    }

    #[test]
    fn test_first_match_wins() {
        let rules = Rules::from(vec![named("first", "p"), named("second", "p")]);
        let p = Node::element("p");
        let p = NodeRef::new(&p);
        assert_eq!(rules.for_node(&p).map(|r| r.name()), Some("first"));
    }

    #[test]
    fn test_no_match() {
        let rules = Rules::from(vec![named("para", "p")]);
        let div = Node::element("div");
        assert!(rules.for_node(&NodeRef::new(&div)).is_none());
    }

    #[test]
    fn test_add_replaces_in_place() {
        let mut rules = Rules::from(vec![named("a", "p"), named("b", "div")]);
        rules.add(named("a", "span"));
        assert_eq!(rules.names().collect::<Vec<_>>(), vec!["a", "b"]);
        let span = Node::element("span");
        assert_eq!(rules.for_node(&NodeRef::new(&span)).map(|r| r.name()), Some("a"));
    }

    #[test]
    fn test_insert_before() {
        let mut rules = Rules::commonmark();
        assert!(rules.insert_before("fallback", named("mark", "mark")));
        let names: Vec<&str> = rules.names().collect();
        assert_eq!(&names[names.len() - 2..], &["mark", "fallback"]);
        assert!(!rules.insert_before("missing", named("x", "x")));
    }

    #[test]
    fn test_insert_before_moves_existing_name() {
        let mut rules = Rules::commonmark();
        let before = rules.len();
        assert!(rules.insert_before(
            "fallback",
            Rule::new("text", Filter::NodeType(NodeType::Text), |_, _| {
                Ok(vec![Element::text("X")])
            }),
        ));

        let names: Vec<&str> = rules.names().collect();
        assert_eq!(rules.len(), before);
        assert_eq!(&names[names.len() - 2..], &["text", "fallback"]);

        let p = Node::element("p").with_child(Node::text("hi"));
        let converter = crate::Converter::with_rules(rules);
        assert_eq!(converter.convert(&p).unwrap(), "X");
    }

    #[test]
    fn test_insert_before_itself_replaces() {
        let mut rules = Rules::from(vec![named("a", "p"), named("b", "div")]);
        assert!(rules.insert_before("b", named("b", "span")));
        assert_eq!(rules.names().collect::<Vec<_>>(), vec!["a", "b"]);
        let span = Node::element("span");
        assert_eq!(rules.for_node(&NodeRef::new(&span)).map(|r| r.name()), Some("b"));
    }

    #[test]
    fn test_remove() {
        let mut rules = Rules::commonmark();
        let before = rules.len();
        assert!(rules.remove("fallback").is_some());
        assert_eq!(rules.len(), before - 1);
        assert!(rules.get("fallback").is_none());
    }

    #[test]
    fn test_rules_are_shared() {
        let shared: Arc<dyn ConvertRule> = Arc::new(Rule::for_tag("kbd", |node, _| {
            Ok(vec![Element::Code(node.text_content())])
        }));
        let mut first = Rules::new();
        let mut second = Rules::new();
        first.add_shared(shared.clone());
        second.add_shared(shared.clone());
        assert_eq!(Arc::strong_count(&shared), 3);
    }
}
