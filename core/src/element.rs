//! Everything that can sit in a container or a node-typed parameter slot.

use std::rc::Rc;

use crate::category::{Category, CategorySet};
use crate::leaf::quote_string;
use crate::node::Node;
use crate::toggle::PairToggle;
use crate::tone::Tone;

/// Characters that force markup text into a quoted string.
const MARKUP_SPECIAL: &[char] = &['\\', '{', '}', '"', '#', '$', '%', '=', '^', '_', '~'];

/// A tree element.
///
/// Toggles are shared: the same [`PairToggle`] is usually placed where a
/// slur or hairpin opens and again where it closes, and the two sites render
/// the opening and closing token in traversal order. Equality compares
/// toggles by identity and everything else by value.
#[derive(Debug, Clone)]
pub enum Element {
    Node(Node),
    Toggle(Rc<PairToggle>),
    Tone(Tone),
    Text(MarkupText),
    Comment(Comment),
}

impl Element {
    /// Categories the element carries.
    pub fn categories(&self) -> CategorySet {
        match self {
            Element::Node(node) => node.categories(),
            Element::Toggle(toggle) => toggle.categories(),
            Element::Tone(_) => CategorySet::single(Category::Music),
            Element::Text(_) => CategorySet::single(Category::Markup),
            Element::Comment(_) => CategorySet::single(Category::Comment),
        }
    }

    pub fn is_inline(&self) -> bool {
        match self {
            Element::Node(node) => node.is_inline(),
            Element::Comment(_) => false,
            Element::Toggle(_) | Element::Tone(_) | Element::Text(_) => true,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Element::Node(node) => Some(node),
            _ => None,
        }
    }

    pub(crate) fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Element::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Short description for error messages; never advances toggles.
    pub fn describe(&self) -> String {
        match self {
            Element::Node(node) => format!("element `{}`", node.name()),
            Element::Toggle(toggle) => format!("toggle `{}`", toggle.open()),
            Element::Tone(_) => "tone".to_string(),
            Element::Text(text) => format!("markup text {:?}", text.text()),
            Element::Comment(_) => "comment".to_string(),
        }
    }

    /// Renders the element at `indent`.
    ///
    /// Toggles advance their shared counter on every call.
    pub fn format(&self, indent: usize) -> String {
        match self {
            Element::Node(node) => node.format(indent),
            Element::Toggle(toggle) => toggle.format(),
            Element::Tone(tone) => tone.format(),
            Element::Text(text) => text.format(),
            Element::Comment(comment) => comment.format(),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::Node(a), Element::Node(b)) => a == b,
            (Element::Toggle(a), Element::Toggle(b)) => Rc::ptr_eq(a, b),
            (Element::Tone(a), Element::Tone(b)) => a == b,
            (Element::Text(a), Element::Text(b)) => a == b,
            (Element::Comment(a), Element::Comment(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Node> for Element {
    fn from(node: Node) -> Self {
        Element::Node(node)
    }
}

impl From<Rc<PairToggle>> for Element {
    fn from(toggle: Rc<PairToggle>) -> Self {
        Element::Toggle(toggle)
    }
}

impl From<&Rc<PairToggle>> for Element {
    fn from(toggle: &Rc<PairToggle>) -> Self {
        Element::Toggle(Rc::clone(toggle))
    }
}

impl From<Tone> for Element {
    fn from(tone: Tone) -> Self {
        Element::Tone(tone)
    }
}

impl From<MarkupText> for Element {
    fn from(text: MarkupText) -> Self {
        Element::Text(text)
    }
}

impl From<Comment> for Element {
    fn from(comment: Comment) -> Self {
        Element::Comment(comment)
    }
}

/// Plain words inside a markup block.
///
/// # Examples
///
/// ```
/// use lilyflower_core::MarkupText;
///
/// assert_eq!(MarkupText::new("dolce").format(), "dolce");
/// assert_eq!(MarkupText::new("molto rit.").format(), "\"molto rit.\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupText {
    text: String,
}

impl MarkupText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bare word when safe, otherwise a quoted string.
    pub fn format(&self) -> String {
        let bare = !self.text.is_empty()
            && !self
                .text
                .chars()
                .any(|c| c.is_whitespace() || MARKUP_SPECIAL.contains(&c));
        if bare {
            self.text.clone()
        } else {
            quote_string(&self.text)
        }
    }
}

/// Block comment, always placed on its own line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> String {
        // A literal "%}" would end the block early.
        format!("%{{ {} %}}", self.text.replace("%}", "% }"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_text_quoting() {
        assert_eq!(MarkupText::new("allegro").format(), "allegro");
        assert_eq!(MarkupText::new("").format(), "\"\"");
        assert_eq!(MarkupText::new("a=b").format(), "\"a=b\"");
        assert_eq!(MarkupText::new("say \"x\"").format(), r#""say \"x\"""#);
    }

    #[test]
    fn test_comment_format() {
        assert_eq!(Comment::new("verse 1").format(), "%{ verse 1 %}");
        assert_eq!(Comment::new("50%} off").format(), "%{ 50% } off %}");
    }

    #[test]
    fn test_element_categories_and_inline() {
        let text = Element::from(MarkupText::new("x"));
        assert_eq!(text.categories(), CategorySet::single(Category::Markup));
        assert!(text.is_inline());

        let comment = Element::from(Comment::new("x"));
        assert_eq!(comment.categories(), CategorySet::single(Category::Comment));
        assert!(!comment.is_inline());
    }

    #[test]
    fn test_toggle_equality_is_identity() {
        let a = Rc::new(PairToggle::slur());
        let b = Rc::new(PairToggle::slur());
        assert_eq!(Element::from(&a), Element::from(&a));
        assert_ne!(Element::from(&a), Element::from(&b));
    }
}
