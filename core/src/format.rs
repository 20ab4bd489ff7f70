//! The recursive pretty-printer.
//!
//! Output must be byte-for-byte stable, so the layout rules are few and
//! fixed. A node renders as its prefix (position marker and tag), then its
//! parameters, then for containers its delimiters and children:
//!
//! - no children: `tag params { }` on one line;
//! - one child: `tag params { child }` on one line;
//! - two or more: each child on its own line one level deeper, except that
//!   an inline child directly after another inline child stays on the same
//!   line, separated by one space; the closing delimiter goes on its own
//!   line at the node's level.
//!
//! Empty parts (no tag, no parameters, empty delimiters) are skipped when
//! the parts of a line are joined with spaces.

use crate::element::Element;
use crate::leaf::quote_string;
use crate::node::Node;

/// One level of indentation.
pub const INDENT_UNIT: &str = "  ";

pub(crate) fn format_node(node: &Node, indent: usize) -> String {
    let mut head = vec![format!("{}{}", node.position().marker(), node.tag())];
    head.extend(node.parameters().iter().map(|(_, value)| value.format(indent)));

    let Some(children) = node.child_slice() else {
        return join(&head);
    };
    let open = node.rule().delimiter_open.clone();
    let close = node.rule().delimiter_close.clone();

    match children {
        [] => {
            head.extend([open, close]);
            join(&head)
        }
        [child] => {
            head.extend([open, child.format(indent), close]);
            join(&head)
        }
        _ => {
            head.push(open);
            let mut out = join(&head);
            write_children(&mut out, children, indent + 1);
            out.push('\n');
            out.push_str(&INDENT_UNIT.repeat(indent));
            out.push_str(&close);
            out
        }
    }
}

/// Writes each child after its separator: a space between two inline
/// siblings, otherwise a newline and `indent` levels.
fn write_children(out: &mut String, children: &[Element], indent: usize) {
    let mut previous: Option<&Element> = None;
    for child in children {
        if previous.is_some_and(|p| p.is_inline() && child.is_inline()) {
            out.push(' ');
        } else {
            out.push('\n');
            out.push_str(&INDENT_UNIT.repeat(indent));
        }
        out.push_str(&child.format(indent));
        previous = Some(child);
    }
}

fn join(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A whole source file: an optional version header and top-level elements.
///
/// # Examples
///
/// ```
/// use lilyflower_core::{Comment, Document, Pitch, Tone};
///
/// let mut document = Document::new().with_version("2.24.0");
/// document.push(Comment::new("generated"));
/// document.push(Tone::note(Pitch::new("c", "'").unwrap(), "4").unwrap());
/// document.push(Tone::rest("4").unwrap());
/// assert_eq!(
///     document.render(),
///     "\\version \"2.24.0\"\n%{ generated %}\nc'4 r4\n"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    version: Option<String>,
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Renders the file. Toggles in the tree advance as they are visited.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(version) = &self.version {
            out.push_str(&format!("\\version {}\n", quote_string(version)));
        }

        let mut previous: Option<&Element> = None;
        for element in &self.elements {
            match previous {
                Some(p) if p.is_inline() && element.is_inline() => out.push(' '),
                Some(_) => out.push('\n'),
                None => {}
            }
            out.push_str(&element.format(0));
            previous = Some(element);
        }
        if previous.is_some() {
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{Arguments, Category, CategorySet, Comment, MarkupText, SchemaRule};

    fn markup() -> CategorySet {
        CategorySet::from_slice(&[Category::Markup, Category::Comment])
    }

    fn container(tag: &str, children: Vec<Element>) -> Node {
        let rule = SchemaRule::container("block", tag, markup(), markup());
        Node::new(Arc::new(rule), Arguments::new().content(children)).unwrap()
    }

    fn word(text: &str) -> Element {
        MarkupText::new(text).into()
    }

    #[test]
    fn test_join_skips_empty_parts() {
        let parts = vec![String::new(), "{".to_string(), "x".to_string(), "}".to_string()];
        assert_eq!(join(&parts), "{ x }");
    }

    #[test]
    fn test_untagged_single_child() {
        assert_eq!(container("", vec![word("x")]).format(0), "{ x }");
    }

    #[test]
    fn test_nested_block_indentation() {
        let inner = container("\\column", vec![word("a"), Comment::new("b").into()]);
        let outer = container("\\markup", vec![inner.into(), word("c")]);
        assert_eq!(
            outer.format(0),
            "\\markup {\n  \\column {\n    a\n    %{ b %}\n  }\n  c\n}"
        );
    }

    #[test]
    fn test_comment_breaks_inline_run() {
        let node = container("\\line", vec![word("a"), Comment::new("x").into(), word("b")]);
        assert_eq!(node.format(1), "\\line {\n    a\n    %{ x %}\n    b\n  }");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(Document::new().render(), "");
        assert_eq!(Document::new().with_version("2.24").render(), "\\version \"2.24\"\n");
    }
}
