//! Nodes: elements bound to a schema rule.
//!
//! A [`Node`] holds the validated parameter values of its rule, an optional
//! position marker (attachments only) and, for containers, an ordered list of
//! children. Every mutation re-runs the same checks as construction, so a
//! node can never hold a value its rule rejects.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::category::CategorySet;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::format::format_node;
use crate::leaf::LeafValue;
use crate::resolve::{Arg, Arguments, check_child, check_value, resolve};
use crate::schema::SchemaRule;

/// Placement marker of an attachment relative to the staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    /// Let the typesetter decide.
    #[default]
    None,
    Up,
    Down,
    Neutral,
}

impl Position {
    /// Text written before the attachment's tag.
    pub fn marker(self) -> &'static str {
        match self {
            Position::None => "",
            Position::Up => "^",
            Position::Down => "_",
            Position::Neutral => "-",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::None => "none",
            Position::Up => "up",
            Position::Down => "down",
            Position::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Position::None),
            "up" => Ok(Position::Up),
            "down" => Ok(Position::Down),
            "neutral" => Ok(Position::Neutral),
            _ => Err(Error::InvalidArgument(format!(
                "expected none, up, down or neutral, not {s:?}"
            ))),
        }
    }
}

/// A resolved parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Leaf(LeafValue),
    Element(Element),
}

impl ParamValue {
    pub fn format(&self, indent: usize) -> String {
        match self {
            ParamValue::Leaf(value) => value.format_top_level(),
            ParamValue::Element(element) => element.format(indent),
        }
    }
}

/// One element of the tree, bound to its [`SchemaRule`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use lilyflower_core::*;
///
/// let markup = CategorySet::from_slice(&[Category::Markup, Category::Attachment]);
/// let rule = Arc::new(
///     SchemaRule::container("with_color", "\\with-color", markup, markup)
///         .with_parameter(Parameter::required("color", ParamKind::Leaf(LeafKind::Color))),
/// );
///
/// let mut node = Node::new(
///     Arc::clone(&rule),
///     Arguments::new()
///         .content(vec![MarkupText::new("dolce").into()])
///         .arg(LeafValue::color("red").unwrap()),
/// )
/// .unwrap();
/// assert_eq!(node.format(0), "\\with-color #red { dolce }");
///
/// node.append(MarkupText::new("espressivo")).unwrap();
/// node.set_position(Position::Up).unwrap();
/// assert_eq!(node.format(0), "^\\with-color #red {\n  dolce espressivo\n}");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    rule: Arc<SchemaRule>,
    position: Position,
    parameters: Vec<(String, ParamValue)>,
    children: Option<Vec<Element>>,
}

impl Node {
    /// Resolves `arguments` against `rule`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyArguments`], [`Error::MissingArgument`],
    /// [`Error::InvalidArgument`] or [`Error::InvalidContent`] when the
    /// arguments do not fit the rule.
    pub fn new(rule: Arc<SchemaRule>, arguments: Arguments) -> Result<Self> {
        let resolved = resolve(&rule, arguments)?;
        Ok(Self {
            rule,
            position: resolved.position,
            parameters: resolved.parameters,
            children: resolved.children,
        })
    }

    pub fn rule(&self) -> &Arc<SchemaRule> {
        &self.rule
    }

    pub fn name(&self) -> &str {
        &self.rule.name
    }

    pub fn tag(&self) -> &str {
        &self.rule.tag
    }

    pub fn categories(&self) -> CategorySet {
        self.rule.categories
    }

    pub fn is_inline(&self) -> bool {
        self.rule.inline
    }

    pub fn is_container(&self) -> bool {
        self.rule.is_container()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Sets the position marker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] unless the node is an attachment.
    pub fn set_position(&mut self, position: Position) -> Result<()> {
        if !self.rule.is_attachment() {
            return Err(Error::InvalidArgument(format!(
                "`{}` is not an attachment and takes no position",
                self.rule.name
            )));
        }
        self.position = position;
        Ok(())
    }

    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.parameters
            .iter()
            .find(|(parameter, _)| parameter == name)
            .map(|(_, value)| value)
    }

    /// Bound parameters in declaration order.
    pub fn parameters(&self) -> &[(String, ParamValue)] {
        &self.parameters
    }

    /// Binds or replaces one declared parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for undeclared names and values of
    /// the wrong kind.
    pub fn set_parameter(&mut self, name: &str, value: impl Into<Arg>) -> Result<()> {
        let Some(declared) = self.rule.parameters.iter().position(|p| p.name == name) else {
            return Err(Error::InvalidArgument(format!(
                "`{}` has no parameter `{name}`",
                self.rule.name
            )));
        };
        let value = check_value(&self.rule.name, &self.rule.parameters[declared], value.into())?;

        match self.parameters.iter_mut().find(|(parameter, _)| parameter == name) {
            Some((_, slot)) => *slot = value,
            None => {
                self.parameters.push((name.to_string(), value));
                let rule = Arc::clone(&self.rule);
                self.parameters.sort_by_key(|(parameter, _)| {
                    rule.parameters.iter().position(|p| &p.name == parameter)
                });
            }
        }
        Ok(())
    }

    /// Children of a container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAContainer`] for leaf commands.
    pub fn children(&self) -> Result<&[Element]> {
        match &self.children {
            Some(children) => Ok(children),
            None => Err(self.not_a_container()),
        }
    }

    /// Number of children; always 0 for leaf commands.
    pub fn len(&self) -> usize {
        self.children.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.children.as_ref()?.get(index)
    }

    pub fn append(&mut self, child: impl Into<Element>) -> Result<()> {
        let child = child.into();
        check_child(&self.rule, &child)?;
        self.children_mut()?.push(child);
        Ok(())
    }

    /// Appends every child, or none of them if one is rejected.
    pub fn extend(&mut self, children: impl IntoIterator<Item = Element>) -> Result<()> {
        let children: Vec<Element> = children.into_iter().collect();
        self.children_mut()?;
        for child in &children {
            check_child(&self.rule, child)?;
        }
        self.children_mut()?.extend(children);
        Ok(())
    }

    /// Inserts a child before `index`, clamped to the end.
    pub fn insert(&mut self, index: usize, child: impl Into<Element>) -> Result<()> {
        let child = child.into();
        check_child(&self.rule, &child)?;
        let children = self.children_mut()?;
        let index = index.min(children.len());
        children.insert(index, child);
        Ok(())
    }

    /// Replaces the child at `index` and returns the old one.
    pub fn set(&mut self, index: usize, child: impl Into<Element>) -> Result<Element> {
        let child = child.into();
        check_child(&self.rule, &child)?;
        let slot = self.child_at(index)?;
        Ok(std::mem::replace(slot, child))
    }

    /// Removes and returns the child at `index`.
    pub fn delete(&mut self, index: usize) -> Result<Element> {
        self.child_at(index)?;
        Ok(self.children_mut()?.remove(index))
    }

    /// Removes and returns the last child.
    pub fn pop(&mut self) -> Result<Element> {
        let len = self.children()?.len();
        match len.checked_sub(1) {
            Some(last) => self.delete(last),
            None => Err(self.out_of_range(0)),
        }
    }

    /// Removes the first child equal to `child`.
    pub fn remove(&mut self, child: &Element) -> Result<()> {
        let index = self.index(child)?;
        self.children_mut()?.remove(index);
        Ok(())
    }

    pub fn count(&self, child: &Element) -> Result<usize> {
        Ok(self.children()?.iter().filter(|c| *c == child).count())
    }

    /// Position of the first child equal to `child`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChildNotFound`] if there is none.
    pub fn index(&self, child: &Element) -> Result<usize> {
        self.children()?
            .iter()
            .position(|c| c == child)
            .ok_or_else(|| Error::ChildNotFound(self.rule.name.clone()))
    }

    /// Reverses the children, then the children of nested containers down to
    /// `depth` more levels (negative for no limit).
    ///
    /// Toggle counters are left alone, so reversing a tree that uses the
    /// same toggle twice swaps which site renders the opening token.
    pub fn reverse(&mut self, depth: i32) -> Result<()> {
        let children = self.children_mut()?;
        children.reverse();
        if depth != 0 {
            for node in children.iter_mut().filter_map(Element::as_node_mut) {
                if node.is_container() {
                    node.reverse(deeper(depth))?;
                }
            }
        }
        Ok(())
    }

    /// Stable-sorts the children with `compare`, recursing like
    /// [`reverse`](Node::reverse).
    pub fn sort_by<F>(&mut self, depth: i32, mut compare: F) -> Result<()>
    where
        F: FnMut(&Element, &Element) -> Ordering,
    {
        self.sort_with(depth, &mut compare)
    }

    fn sort_with(
        &mut self,
        depth: i32,
        compare: &mut dyn FnMut(&Element, &Element) -> Ordering,
    ) -> Result<()> {
        let children = self.children_mut()?;
        children.sort_by(|a, b| compare(a, b));
        if depth != 0 {
            for node in children.iter_mut().filter_map(Element::as_node_mut) {
                if node.is_container() {
                    node.sort_with(deeper(depth), compare)?;
                }
            }
        }
        Ok(())
    }

    /// Repeats the current children `times` times in place.
    pub fn repeat(&mut self, times: usize) -> Result<()> {
        let children = self.children_mut()?;
        let original = std::mem::take(children);
        children.reserve(original.len() * times);
        for _ in 0..times {
            children.extend(original.iter().cloned());
        }
        Ok(())
    }

    /// Renders the node and its subtree at `indent` levels.
    pub fn format(&self, indent: usize) -> String {
        format_node(self, indent)
    }

    pub(crate) fn child_slice(&self) -> Option<&[Element]> {
        self.children.as_deref()
    }

    fn children_mut(&mut self) -> Result<&mut Vec<Element>> {
        match &mut self.children {
            Some(children) => Ok(children),
            None => Err(Error::NotAContainer(self.rule.name.clone())),
        }
    }

    fn child_at(&mut self, index: usize) -> Result<&mut Element> {
        let len = self.children()?.len();
        if index >= len {
            return Err(self.out_of_range(index));
        }
        Ok(&mut self.children_mut()?[index])
    }

    fn not_a_container(&self) -> Error {
        Error::NotAContainer(self.rule.name.clone())
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::IndexOutOfRange {
            element: self.rule.name.clone(),
            index,
            len: self.len(),
        }
    }
}

fn deeper(depth: i32) -> i32 {
    if depth < 0 { depth } else { depth - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, MarkupText, Tone};

    fn markup() -> CategorySet {
        CategorySet::from_slice(&[Category::Markup, Category::Attachment])
    }

    fn line_rule() -> Arc<SchemaRule> {
        Arc::new(SchemaRule::container("line", "\\line", markup(), markup()))
    }

    fn line(words: &[&str]) -> Node {
        let children = words.iter().map(|w| Element::from(MarkupText::new(*w))).collect();
        Node::new(line_rule(), Arguments::new().content(children)).unwrap()
    }

    fn word(text: &str) -> Element {
        MarkupText::new(text).into()
    }

    fn texts(node: &Node) -> Vec<String> {
        node.children()
            .unwrap()
            .iter()
            .map(|child| child.format(0))
            .collect()
    }

    #[test]
    fn test_position_tokens() {
        assert_eq!("neutral".parse::<Position>(), Ok(Position::Neutral));
        assert_eq!(Position::Down.marker(), "_");
        assert!("left".parse::<Position>().is_err());
    }

    #[test]
    fn test_leaf_command_rejects_list_operations() {
        let rule = Arc::new(SchemaRule::command("fermata", "\\fermata", markup()));
        let mut node = Node::new(rule, Arguments::new()).unwrap();
        let err = Error::NotAContainer("fermata".into());
        assert_eq!(node.append(word("x")), Err(err.clone()));
        assert_eq!(node.pop(), Err(err.clone()));
        assert_eq!(node.reverse(0), Err(err.clone()));
        assert_eq!(node.repeat(2), Err(err.clone()));
        assert_eq!(node.count(&word("x")), Err(err));
        assert!(node.is_empty());
    }

    #[test]
    fn test_append_checks_content() {
        let mut node = line(&[]);
        let rest = Tone::rest("4").unwrap();
        assert!(matches!(node.append(rest), Err(Error::InvalidContent { .. })));
        assert!(node.is_empty());
    }

    #[test]
    fn test_extend_is_atomic() {
        let mut node = line(&["a"]);
        let rest = Element::from(Tone::rest("4").unwrap());
        assert!(node.extend(vec![word("b"), rest]).is_err());
        assert_eq!(texts(&node), vec!["a"]);
        node.extend(vec![word("b"), word("c")]).unwrap();
        assert_eq!(texts(&node), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut node = line(&["a", "b"]);
        node.insert(0, word("first")).unwrap();
        node.insert(99, word("last")).unwrap();
        assert_eq!(texts(&node), vec!["first", "a", "b", "last"]);
    }

    #[test]
    fn test_insert_and_set_check_content() {
        let mut node = line(&["a", "b"]);
        let rest = Tone::rest("4").unwrap();
        assert!(matches!(
            node.insert(0, rest.clone()),
            Err(Error::InvalidContent { .. })
        ));
        assert!(matches!(node.set(0, rest), Err(Error::InvalidContent { .. })));
        assert_eq!(texts(&node), vec!["a", "b"]);
    }

    #[test]
    fn test_set_delete_and_pop() {
        let mut node = line(&["a", "b", "c"]);
        assert_eq!(node.set(1, word("B")).unwrap(), word("b"));
        assert_eq!(node.delete(0).unwrap(), word("a"));
        assert_eq!(node.pop().unwrap(), word("c"));
        assert_eq!(texts(&node), vec!["B"]);
        assert_eq!(
            node.set(5, word("x")),
            Err(Error::IndexOutOfRange {
                element: "line".into(),
                index: 5,
                len: 1
            })
        );
        node.pop().unwrap();
        assert!(matches!(node.pop(), Err(Error::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_remove_count_and_index() {
        let mut node = line(&["a", "b", "a"]);
        assert_eq!(node.count(&word("a")).unwrap(), 2);
        assert_eq!(node.index(&word("b")).unwrap(), 1);
        node.remove(&word("a")).unwrap();
        assert_eq!(texts(&node), vec!["b", "a"]);
        assert_eq!(
            node.remove(&word("z")),
            Err(Error::ChildNotFound("line".into()))
        );
    }

    #[test]
    fn test_reverse_depth() {
        let inner = line(&["x", "y"]);
        let mut outer = line(&["a"]);
        outer.append(inner).unwrap();

        let mut shallow = outer.clone();
        shallow.reverse(0).unwrap();
        assert_eq!(texts(shallow.get(0).unwrap().as_node().unwrap()), vec!["x", "y"]);

        outer.reverse(-1).unwrap();
        let nested = outer.get(0).unwrap().as_node().unwrap();
        assert_eq!(texts(nested), vec!["y", "x"]);
        assert_eq!(outer.get(1), Some(&word("a")));
    }

    #[test]
    fn test_reverse_depth_limit() {
        let mut middle = line(&["m1", "m2"]);
        middle.append(line(&["x", "y"])).unwrap();
        let mut outer = line(&["a"]);
        outer.append(middle).unwrap();

        outer.reverse(1).unwrap();
        let middle = outer.get(0).unwrap().as_node().unwrap();
        assert_eq!(middle.get(2), Some(&word("m1")));
        let innermost = middle.get(0).unwrap().as_node().unwrap();
        assert_eq!(texts(innermost), vec!["x", "y"]);
        assert_eq!(outer.get(1), Some(&word("a")));
    }

    #[test]
    fn test_sort_by_text() {
        let mut node = line(&["c", "a", "b"]);
        node.sort_by(0, |a, b| a.describe().cmp(&b.describe())).unwrap();
        assert_eq!(texts(&node), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_recursive() {
        let mut inner = line(&["z", "x"]);
        inner.append(line(&["q", "p"])).unwrap();
        let mut outer = line(&["b", "a"]);
        outer.append(inner).unwrap();

        let by_text = |a: &Element, b: &Element| a.format(0).cmp(&b.format(0));
        outer.sort_by(-1, by_text).unwrap();

        assert_eq!(outer.get(1), Some(&word("a")));
        assert_eq!(outer.get(2), Some(&word("b")));
        let inner = outer.get(0).unwrap().as_node().unwrap();
        assert_eq!(inner.get(1), Some(&word("x")));
        assert_eq!(inner.get(2), Some(&word("z")));
        let innermost = inner.get(0).unwrap().as_node().unwrap();
        assert_eq!(texts(innermost), vec!["p", "q"]);
    }

    #[test]
    fn test_repeat() {
        let mut node = line(&["a", "b"]);
        node.repeat(2).unwrap();
        assert_eq!(texts(&node), vec!["a", "b", "a", "b"]);
        node.repeat(0).unwrap();
        assert!(node.is_empty());
    }

    #[test]
    fn test_set_parameter_keeps_declaration_order() {
        use crate::{LeafKind, ParamKind, Parameter};

        let float = ParamKind::Leaf(LeafKind::SignedFloat);
        let rule = Arc::new(
            SchemaRule::command("box", "\\box", markup())
                .with_parameter(Parameter::optional("width", float))
                .with_parameter(Parameter::optional("height", float)),
        );
        let mut node = Node::new(rule, Arguments::new()).unwrap();
        node.set_parameter("height", LeafValue::signed_float(2.0).unwrap()).unwrap();
        node.set_parameter("width", LeafValue::signed_float(1.0).unwrap()).unwrap();
        assert_eq!(node.format(0), "\\box #1.0 #2.0");

        assert!(node.set_parameter("width", LeafValue::string("wide")).is_err());
        assert!(node.set_parameter("depth", LeafValue::signed_int(1)).is_err());
    }

    #[test]
    fn test_set_position_requires_attachment() {
        let rule = Arc::new(SchemaRule::command(
            "bar_break",
            "\\break",
            CategorySet::single(Category::Music),
        ));
        let mut node = Node::new(rule, Arguments::new()).unwrap();
        assert!(node.set_position(Position::Up).is_err());
    }
}
