//! CommonMark rules for HTML to Markdown conversion.

use html2md_core::{group_inlines, trim_inlines, Element, ListItem};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Filter, Rule};
use crate::converter::Converter;
use crate::node::{NodeRef, NodeType};
use crate::utilities::{clean_attribute, collapse_whitespace, is_block, language_from_class};
use crate::ConvertError;

static HEADER_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^h([1-6])$").expect("HEADER_TAG: hardcoded regex is valid"));

/// Create all CommonMark rules, in priority order, ending in the fallback
pub fn commonmark_rules() -> Vec<Rule> {
    vec![
        ignored_rule(),
        text_rule(),
        header_rule(),
        paragraph_rule(),
        line_break_rule(),
        thematic_break_rule(),
        blockquote_rule(),
        list_rule(),
        code_block_rule(),
        code_span_rule(),
        emphasis_rule(),
        strong_rule(),
        link_rule(),
        image_rule(),
        fallback_rule(),
    ]
}

/// Comments and non-content elements produce nothing
pub fn ignored_rule() -> Rule {
    const IGNORED: &[&str] = &["head", "script", "style", "noscript", "template"];

    Rule::new(
        "ignored",
        Filter::predicate(|node| {
            node.node_type() == NodeType::Comment
                || (node.is_element()
                    && IGNORED.iter().any(|t| node.tag_name().eq_ignore_ascii_case(t)))
        }),
        |_, _| Ok(Vec::new()),
    )
}

/// Text nodes become whitespace-collapsed plain text
pub fn text_rule() -> Rule {
    Rule::new("text", Filter::NodeType(NodeType::Text), |node, _| {
        Ok(text_elements(node))
    })
}

fn text_elements(node: &NodeRef<'_>) -> Vec<Element> {
    let text = collapse_whitespace(node.node.node_value.as_deref().unwrap_or_default());
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Element::Text(text)]
    }
}

/// `h1`..`h6` become a heading holding the flattened text content
pub fn header_rule() -> Rule {
    Rule::new(
        "heading",
        Filter::Pattern(HEADER_TAG.clone()),
        |node, _| {
            let level = HEADER_TAG
                .captures(node.tag_name())
                .and_then(|c| c[1].parse::<u8>().ok())
                .ok_or_else(|| ConvertError::malformed(node, "heading tag without a level"))?;

            let text = node.text_content();
            let text = if text.contains(|c: char| c == '\n' || c == '\r') {
                collapse_whitespace(&text).trim().to_string()
            } else {
                text
            };

            Ok(vec![Element::heading(level, text)?])
        },
    )
}

pub fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |node, converter| {
        let inlines = trim_inlines(converter.convert_inlines(node)?);
        if inlines.iter().all(Element::is_blank) {
            Ok(Vec::new())
        } else {
            Ok(vec![Element::Paragraph(inlines)])
        }
    })
}

pub fn line_break_rule() -> Rule {
    Rule::new("line_break", Filter::tag("br"), |_, _| {
        Ok(vec![Element::LineBreak])
    })
}

pub fn thematic_break_rule() -> Rule {
    Rule::new("thematic_break", Filter::tag("hr"), |_, _| {
        Ok(vec![Element::ThematicBreak])
    })
}

pub fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |node, converter| {
        let blocks = converter.convert_blocks(node)?;
        if blocks.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![Element::BlockQuote(blocks)])
        }
    })
}

/// `ul` and `ol`; every `li` child becomes one item
pub fn list_rule() -> Rule {
    Rule::for_tags("list", &["ul", "ol"], |node, converter| {
        let ordered = node.tag_name().eq_ignore_ascii_case("ol");
        let start = node
            .attr("start")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1);

        let mut items = Vec::new();
        for child in node.children() {
            if child.is_element() && child.tag_name().eq_ignore_ascii_case("li") {
                items.push(ListItem::new(converter.convert_blocks(&child)?));
            } else {
                // Stray content between items only survives when it is not blank
                let elements = converter.convert_node(&child)?;
                if !elements.iter().all(Element::is_blank) {
                    items.push(ListItem::new(group_inlines(elements)));
                }
            }
        }

        Ok(vec![Element::List {
            ordered,
            start,
            items,
        }])
    })
}

/// `pre` becomes a fenced code block holding the raw text
pub fn code_block_rule() -> Rule {
    Rule::new("code_block", Filter::tag("pre"), |node, _| {
        let language = node
            .children()
            .find(|c| c.is_element() && c.tag_name().eq_ignore_ascii_case("code"))
            .and_then(|code| code.attr("class"))
            .or_else(|| node.attr("class"))
            .and_then(language_from_class)
            .map(str::to_string);

        let text = node.text_content();
        let code = text
            .strip_prefix("\r\n")
            .or_else(|| text.strip_prefix('\n'))
            .unwrap_or(&text);

        Ok(vec![Element::CodeBlock {
            language,
            code: code.to_string(),
        }])
    })
}

pub fn code_span_rule() -> Rule {
    Rule::new("code_span", Filter::tag("code"), |node, _| {
        let code = node.text_content();
        if code.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![Element::Code(code)])
        }
    })
}

pub fn emphasis_rule() -> Rule {
    Rule::for_tags("emphasis", &["em", "i"], |node, converter| {
        let inlines = converter.convert_inlines(node)?;
        if inlines.iter().all(Element::is_blank) {
            return Ok(inlines);
        }
        Ok(vec![Element::Emphasis(inlines)])
    })
}

pub fn strong_rule() -> Rule {
    Rule::for_tags("strong", &["strong", "b"], |node, converter| {
        let inlines = converter.convert_inlines(node)?;
        if inlines.iter().all(Element::is_blank) {
            return Ok(inlines);
        }
        Ok(vec![Element::Strong(inlines)])
    })
}

/// `a` elements with an `href`; anchors without one fall through
pub fn link_rule() -> Rule {
    Rule::new(
        "link",
        Filter::predicate(|node| {
            node.is_element() && node.tag_name().eq_ignore_ascii_case("a") && node.has_attr("href")
        }),
        |node, converter| {
            let content = converter.convert_inlines(node)?;
            Ok(vec![Element::Link {
                content,
                url: clean_attribute(node.attr("href")),
                title: node.attr("title").map(str::to_string),
            }])
        },
    )
}

pub fn image_rule() -> Rule {
    Rule::for_tag("img", |node, _| {
        let alt = clean_attribute(node.attr("alt"));
        let url = clean_attribute(node.attr("src"));
        if alt.is_empty() && url.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![Element::Image {
            alt,
            url,
            title: node.attr("title").map(str::to_string),
        }])
    })
}

/// Supports every node so the walk never stalls.
///
/// Text becomes plain text, comments vanish, and unknown elements are
/// replaced by their converted children. Block-level containers group inline
/// runs into paragraphs so `<div>a</div><div>b</div>` stays two blocks.
pub fn fallback_rule() -> Rule {
    Rule::new("fallback", Filter::Any, |node, converter| {
        match node.node_type() {
            NodeType::Text => Ok(text_elements(node)),
            NodeType::Comment => Ok(Vec::new()),
            NodeType::Element if is_block(node.tag_name()) => converter.convert_blocks(node),
            _ => converter.convert_children(node),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::rules::Rules;

    fn converter() -> Converter {
        Converter::new()
    }

    fn convert(node: &Node) -> Vec<Element> {
        converter().convert_node(&NodeRef::new(node)).unwrap()
    }

    fn text(s: &str) -> Element {
        Element::text(s)
    }

    fn el(tag: &str, body: &str) -> Node {
        Node::element(tag).with_child(Node::text(body))
    }

    #[test]
    fn test_heading_levels() {
        for level in 1..=6u8 {
            let node = el(&format!("H{level}"), "Title");
            assert_eq!(convert(&node), vec![Element::heading(level, "Title").unwrap()]);
        }
    }

    #[test]
    fn test_heading_flattens_inner_tags() {
        let node = Node::element("h2")
            .with_child(Node::text("Hello "))
            .with_child(el("em", "World"));
        assert_eq!(convert(&node), vec![Element::heading(2, "Hello World").unwrap()]);
    }

    #[test]
    fn test_heading_multiline_text() {
        let node = el("h1", "\n  Spread\n  out\n");
        assert_eq!(convert(&node), vec![Element::heading(1, "Spread out").unwrap()]);
    }

    #[test]
    fn test_heading_rejects_other_tags() {
        let rule = header_rule();
        for tag in ["h0", "h7", "header", "hr"] {
            let node = Node::element(tag);
            assert!(!rule.filter.matches(&NodeRef::new(&node)), "{tag}");
        }
    }

    #[test]
    fn test_paragraph_with_emphasis() {
        let node = Node::element("p")
            .with_child(Node::text("  Hello "))
            .with_child(el("em", "there"))
            .with_child(Node::text("  "));
        assert_eq!(
            convert(&node),
            vec![Element::Paragraph(vec![
                text("Hello "),
                Element::Emphasis(vec![text("there")]),
            ])]
        );
    }

    #[test]
    fn test_empty_paragraph_is_omitted() {
        assert!(convert(&Node::element("p")).is_empty());
        assert!(convert(&el("p", " \n ")).is_empty());
    }

    #[test]
    fn test_void_elements_ignore_children() {
        let br = Node::element("br");
        assert_eq!(convert(&br), vec![Element::LineBreak]);
        assert_eq!(convert(&Node::element("hr")), vec![Element::ThematicBreak]);
    }

    #[test]
    fn test_list_items() {
        let ol = Node::element_with_attrs("ol", vec![("start", "3")])
            .with_child(Node::text("\n  "))
            .with_child(el("li", "One"))
            .with_child(
                Node::element("li")
                    .with_child(Node::text("Two "))
                    .with_child(Node::element("ul").with_child(el("li", "Nested"))),
            );

        let expected = Element::List {
            ordered: true,
            start: 3,
            items: vec![
                ListItem::new(vec![Element::Paragraph(vec![text("One")])]),
                ListItem::new(vec![
                    Element::Paragraph(vec![text("Two")]),
                    Element::list(false, vec![ListItem::new(vec![Element::Paragraph(vec![
                        text("Nested"),
                    ])])]),
                ]),
            ],
        };
        assert_eq!(convert(&ol), vec![expected]);
    }

    #[test]
    fn test_code_block_language() {
        let pre = Node::element("pre").with_child(
            Node::element_with_attrs("code", vec![("class", "language-rust")])
                .with_child(Node::text("\nfn main() {}\n")),
        );
        assert_eq!(
            convert(&pre),
            vec![Element::code_block(Some("rust"), "fn main() {}\n")]
        );
    }

    #[test]
    fn test_code_span() {
        assert_eq!(convert(&el("code", "x < y")), vec![Element::Code("x < y".to_string())]);
        assert!(convert(&Node::element("code")).is_empty());
    }

    #[test]
    fn test_blank_emphasis_keeps_whitespace() {
        assert_eq!(convert(&el("em", " ")), vec![text(" ")]);
        assert!(convert(&Node::element("strong")).is_empty());
    }

    #[test]
    fn test_link() {
        let a = Node::element_with_attrs("a", vec![("href", " https://example.com "), ("title", "Ex")])
            .with_child(Node::text("Example"));
        assert_eq!(
            convert(&a),
            vec![Element::Link {
                content: vec![text("Example")],
                url: "https://example.com".to_string(),
                title: Some("Ex".to_string()),
            }]
        );
    }

    #[test]
    fn test_anchor_without_href_flattens() {
        assert_eq!(convert(&el("a", "plain")), vec![text("plain")]);
    }

    #[test]
    fn test_image() {
        let img = Node::element_with_attrs("img", vec![("src", "a.png"), ("alt", "A")]);
        assert_eq!(convert(&img), vec![Element::image("A", "a.png")]);
        assert!(convert(&Node::element("img")).is_empty());
    }

    #[test]
    fn test_ignored() {
        assert!(convert(&el("script", "alert(1)")).is_empty());
        assert!(convert(&Node::comment("note")).is_empty());
    }

    #[test]
    fn test_fallback_flattens_unknown_tags() {
        let span = Node::element("custom-tag")
            .with_child(Node::text("a "))
            .with_child(el("strong", "b"));
        assert_eq!(
            convert(&span),
            vec![text("a "), Element::Strong(vec![text("b")])]
        );
    }

    #[test]
    fn test_fallback_handles_text_alone() {
        let converter = Converter::with_rules(Rules::from(vec![fallback_rule()]));
        let div = Node::element("div").with_child(el("span", "hi"));
        let elements = converter.convert_node(&NodeRef::new(&div)).unwrap();
        assert_eq!(elements, vec![Element::Paragraph(vec![text("hi")])]);
    }
}
