//! Markdown rendering
//!
//! Converts Markdown elements into Markdown text.

use crate::element::{Element, ListItem};
use crate::escape::{escape_delimiter_runs, escape_text, longest_run};
use crate::options::Options;

/// Render a single element to Markdown
pub fn render(element: &Element, options: &Options) -> String {
    let mut output = String::new();
    write_element(element, options, 0, &mut output);
    output
}

/// Render a sequence of block-level elements, one blank line between each.
///
/// Elements that render to nothing are skipped so they never produce a
/// doubled separator. No trailing blank line is emitted.
pub fn render_blocks(elements: &[Element], options: &Options) -> String {
    let mut output = String::new();

    for element in elements {
        let rendered = render(element, options);
        if rendered.is_empty() {
            continue;
        }
        if !output.is_empty() {
            output.push_str("\n\n");
        }
        output.push_str(&rendered);
    }

    output
}

fn write_element(element: &Element, options: &Options, depth: usize, out: &mut String) {
    match element {
        Element::Heading { level, text } => {
            for _ in 0..level.get() {
                out.push('#');
            }
            out.push(' ');
            out.push_str(&single_line(text));
        }

        Element::Paragraph(inlines) => write_inlines(inlines, out),

        Element::BlockQuote(blocks) => {
            let content = render_blocks(blocks, options);
            for (i, line) in content.lines().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                out.push('>');
                if !line.is_empty() {
                    out.push(' ');
                    out.push_str(line);
                }
            }
        }

        Element::List {
            ordered,
            start,
            items,
        } => write_list(*ordered, *start, items, options, depth, out),

        Element::CodeBlock { language, code } => {
            write_code_block(language.as_deref(), code, options, out)
        }

        Element::ThematicBreak => out.push_str(&options.hr),

        inline => write_inline(inline, out),
    }
}

/// Fold line breaks into single spaces so the text stays on one line
fn single_line(text: &str) -> String {
    if !text.contains(|c: char| c == '\n' || c == '\r') {
        return text.to_string();
    }
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_list(
    ordered: bool,
    start: u32,
    items: &[ListItem],
    options: &Options,
    depth: usize,
    out: &mut String,
) {
    let indent = " ".repeat(options.list_indent * depth);

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }

        let marker = if ordered {
            format!("{}. ", u64::from(start) + i as u64)
        } else {
            format!("{} ", options.bullet_list_marker)
        };

        out.push_str(&indent);
        out.push_str(&marker);

        let continuation = format!("{}{}", indent, " ".repeat(marker.len()));
        write_list_item(item, options, depth, &continuation, out);
    }
}

fn write_list_item(
    item: &ListItem,
    options: &Options,
    depth: usize,
    continuation: &str,
    out: &mut String,
) {
    let mut first_line = true;
    let mut run: Vec<&Element> = Vec::new();

    for element in &item.content {
        if let Element::List { .. } = element {
            flush_item_text(&mut run, continuation, &mut first_line, out);
            out.push('\n');
            write_element(element, options, depth + 1, out);
            first_line = false;
        } else if element.is_block() {
            flush_item_text(&mut run, continuation, &mut first_line, out);
            let rendered = render(element, options);
            write_item_lines(&rendered, continuation, &mut first_line, out);
        } else {
            run.push(element);
        }
    }
    flush_item_text(&mut run, continuation, &mut first_line, out);
}

fn flush_item_text(
    run: &mut Vec<&Element>,
    continuation: &str,
    first_line: &mut bool,
    out: &mut String,
) {
    if run.is_empty() {
        return;
    }
    let inlines: Vec<Element> = run.drain(..).cloned().collect();
    let mut text = String::new();
    write_inlines(&inlines, &mut text);
    write_item_lines(text.trim(), continuation, first_line, out);
}

/// Write item text, indenting every line after the marker line
fn write_item_lines(text: &str, continuation: &str, first_line: &mut bool, out: &mut String) {
    if text.is_empty() {
        return;
    }
    for line in text.lines() {
        if !*first_line {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(continuation);
            }
        }
        out.push_str(line);
        *first_line = false;
    }
}

fn write_code_block(language: Option<&str>, code: &str, options: &Options, out: &mut String) {
    let fence_char = options.fence.chars().next().unwrap_or('`');
    let fence_len = options
        .fence
        .chars()
        .count()
        .max(3)
        .max(longest_run(code, fence_char) + 1);
    let fence: String = std::iter::repeat(fence_char).take(fence_len).collect();

    out.push_str(&fence);
    out.push_str(language.unwrap_or(""));
    out.push('\n');
    let code = code.trim_end_matches('\n');
    if !code.is_empty() {
        out.push_str(code);
        out.push('\n');
    }
    out.push_str(&fence);
}

fn write_inlines(inlines: &[Element], out: &mut String) {
    let mut i = 0;
    while i < inlines.len() {
        match &inlines[i] {
            Element::Text(text) => {
                let before_link = matches!(inlines.get(i + 1), Some(Element::Link { .. }));
                write_text(text, before_link, out);
                i += 1;
            }
            Element::Emphasis(_) | Element::Strong(_) => {
                // Neighbours of the same kind share one pair of delimiters
                let kind = std::mem::discriminant(&inlines[i]);
                let end = inlines[i..]
                    .iter()
                    .position(|e| std::mem::discriminant(e) != kind)
                    .map_or(inlines.len(), |n| i + n);
                if end - i == 1 {
                    write_inline(&inlines[i], out);
                } else {
                    write_inline(&merge_delimited(&inlines[i..end]), out);
                }
                i = end;
            }
            inline => {
                write_inline(inline, out);
                i += 1;
            }
        }
    }
}

fn merge_delimited(run: &[Element]) -> Element {
    let content: Vec<Element> = run
        .iter()
        .flat_map(|e| match e {
            Element::Emphasis(content) | Element::Strong(content) => content.clone(),
            other => vec![other.clone()],
        })
        .collect();
    match run.first() {
        Some(Element::Strong(_)) => Element::Strong(content),
        _ => Element::Emphasis(content),
    }
}

/// Write escaped text, collapsing a space doubled at the seam with the
/// preceding output. A `!` right before a link would open an image.
fn write_text(text: &str, before_link: bool, out: &mut String) {
    let mut escaped = escape_text(text);
    if out.ends_with(' ') {
        escaped = escaped.trim_start_matches(' ').to_string();
    }
    if before_link && escaped.ends_with('!') {
        escaped.pop();
        escaped.push_str("\\!");
    }
    out.push_str(&escaped);
}

fn render_inlines(inlines: &[Element]) -> String {
    let mut out = String::new();
    write_inlines(inlines, &mut out);
    out
}

fn write_inline(inline: &Element, out: &mut String) {
    match inline {
        Element::Text(text) => out.push_str(&escape_text(text)),

        // Inside emphasis only odd runs could close it early; `**` stays live
        Element::Emphasis(content) => write_delimited(content, "*", |run| run % 2 == 1, out),

        Element::Strong(content) => write_delimited(content, "**", |run| run >= 2, out),

        Element::Code(code) => write_code_span(code, out),

        Element::Link {
            content,
            url,
            title,
        } => {
            out.push('[');
            write_inlines(content, out);
            out.push_str("](");
            write_destination(url, title.as_deref(), out);
            out.push(')');
        }

        Element::Image { alt, url, title } => {
            out.push_str("![");
            out.push_str(&escape_text(alt));
            out.push_str("](");
            write_destination(url, title.as_deref(), out);
            out.push(')');
        }

        Element::LineBreak => out.push_str("  \n"),

        // Blocks nested in inline content render as their inline text
        block => {
            let inlines = block.clone().into_inlines();
            write_inlines(&inlines, out);
        }
    }
}

/// Wrap content in `delimiter`, escaping live runs of the same delimiter and
/// keeping surrounding whitespace outside the delimiters.
fn write_delimited<F>(content: &[Element], delimiter: &str, escape_run: F, out: &mut String)
where
    F: Fn(usize) -> bool,
{
    let inner = render_inlines(content);
    if inner.trim().is_empty() {
        out.push_str(&inner);
        return;
    }

    let marker = delimiter.chars().next().unwrap_or('*');
    let escaped = escape_delimiter_runs(&inner, marker, escape_run);
    let core = escaped.trim();
    let start = escaped.len() - escaped.trim_start().len();
    let end = start + core.len();

    let leading = &escaped[..start];
    let leading = if out.ends_with(' ') {
        leading.trim_start_matches(' ')
    } else {
        leading
    };
    out.push_str(leading);
    out.push_str(delimiter);
    out.push_str(core);
    out.push_str(delimiter);
    out.push_str(&escaped[end..]);
}

fn write_code_span(code: &str, out: &mut String) {
    if code.is_empty() {
        return;
    }

    let longest = longest_run(code, '`');
    let ticks = if longest == 0 { 1 } else { (longest + 1).max(3) };
    let backticks = "`".repeat(ticks);
    let space = if code.starts_with('`') || code.ends_with('`') {
        " "
    } else {
        ""
    };

    out.push_str(&backticks);
    out.push_str(space);
    out.push_str(code);
    out.push_str(space);
    out.push_str(&backticks);
}

fn write_destination(url: &str, title: Option<&str>, out: &mut String) {
    if url.contains(|c: char| c.is_whitespace() || c == '(' || c == ')') {
        out.push('<');
        out.push_str(url);
        out.push('>');
    } else {
        out.push_str(url);
    }
    if let Some(title) = title {
        out.push_str(" \"");
        out.push_str(&title.replace('"', "\\\""));
        out.push('"');
    }
}
