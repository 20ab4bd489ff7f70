//! Argument resolution for node construction.
//!
//! A caller hands [`Node::new`](crate::Node::new) a mix of positional and
//! named [`Arg`]s. Resolution binds them to the rule's slots in a fixed
//! order:
//!
//! 1. named values go to the slot of the same name;
//! 2. if the content slot is still empty, the first positional sequence
//!    becomes the content;
//! 3. the remaining positional values fill the empty declared parameters in
//!    order, then the position slot;
//! 4. a value left over after that is [`Error::TooManyArguments`];
//! 5. an unbound required parameter is [`Error::MissingArgument`];
//! 6. every bound parameter is checked against its [`ParamKind`];
//! 7. every child is checked against the accepted content categories;
//! 8. the position value must name a [`Position`].
//!
//! Step 2 runs before step 3 so that a list of children can appear anywhere
//! among the positional values without landing in a scalar slot.

use std::rc::Rc;

use tracing::trace;

use crate::element::{Comment, Element, MarkupText};
use crate::error::{Error, Result};
use crate::leaf::LeafValue;
use crate::node::{Node, ParamValue, Position};
use crate::schema::{CONTENT_SLOT, POSITION_SLOT, ParamKind, Parameter, SchemaRule};
use crate::toggle::PairToggle;
use crate::tone::Tone;

/// One argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Leaf(LeafValue),
    Element(Element),
    /// A bare sequence of children.
    Sequence(Vec<Element>),
    Position(Position),
}

impl Arg {
    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Arg::Leaf(value) => format!("{} value {value}", value.kind()),
            Arg::Element(element) => element.describe(),
            Arg::Sequence(items) => format!("a sequence of {} elements", items.len()),
            Arg::Position(position) => format!("position `{}`", position.as_str()),
        }
    }
}

impl From<LeafValue> for Arg {
    fn from(value: LeafValue) -> Self {
        Arg::Leaf(value)
    }
}

impl From<Element> for Arg {
    fn from(element: Element) -> Self {
        Arg::Element(element)
    }
}

impl From<Node> for Arg {
    fn from(node: Node) -> Self {
        Arg::Element(node.into())
    }
}

impl From<Tone> for Arg {
    fn from(tone: Tone) -> Self {
        Arg::Element(tone.into())
    }
}

impl From<MarkupText> for Arg {
    fn from(text: MarkupText) -> Self {
        Arg::Element(text.into())
    }
}

impl From<Comment> for Arg {
    fn from(comment: Comment) -> Self {
        Arg::Element(comment.into())
    }
}

impl From<Rc<PairToggle>> for Arg {
    fn from(toggle: Rc<PairToggle>) -> Self {
        Arg::Element(toggle.into())
    }
}

impl From<&Rc<PairToggle>> for Arg {
    fn from(toggle: &Rc<PairToggle>) -> Self {
        Arg::Element(toggle.into())
    }
}

impl From<Vec<Element>> for Arg {
    fn from(items: Vec<Element>) -> Self {
        Arg::Sequence(items)
    }
}

impl From<Position> for Arg {
    fn from(position: Position) -> Self {
        Arg::Position(position)
    }
}

/// Positional and named arguments for a node.
///
/// # Examples
///
/// ```
/// use lilyflower_core::*;
///
/// let args = Arguments::new()
///     .arg(LeafValue::color("red").unwrap())
///     .named("position", Position::Up)
///     .content(vec![MarkupText::new("forte").into()]);
/// assert_eq!(args.positional().len(), 2);
/// assert_eq!(args.named_values().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Arg>,
    named: Vec<(String, Arg)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional value.
    pub fn arg(mut self, value: impl Into<Arg>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Adds a value bound by slot name.
    pub fn named(mut self, name: &str, value: impl Into<Arg>) -> Self {
        self.named.push((name.to_string(), value.into()));
        self
    }

    /// Appends a bare sequence of children as a positional value.
    pub fn content(self, children: Vec<Element>) -> Self {
        self.arg(Arg::Sequence(children))
    }

    pub fn positional(&self) -> &[Arg] {
        &self.positional
    }

    pub fn named_values(&self) -> &[(String, Arg)] {
        &self.named
    }
}

/// Fully validated slot values of a node.
#[derive(Debug)]
pub(crate) struct Resolved {
    pub parameters: Vec<(String, ParamValue)>,
    pub position: Position,
    pub children: Option<Vec<Element>>,
}

/// Binds `arguments` to the slots of `rule` and validates every value.
pub(crate) fn resolve(rule: &SchemaRule, arguments: Arguments) -> Result<Resolved> {
    let element = rule.name.as_str();
    let mut slots: Vec<Option<Arg>> = rule.parameters.iter().map(|_| None).collect();
    let mut position: Option<Arg> = None;
    let mut content: Option<Vec<Element>> = None;

    for (name, value) in arguments.named {
        if let Some(i) = rule.parameters.iter().position(|p| p.name == name) {
            fill_once(&mut slots[i], value, element, &name)?;
        } else if name == POSITION_SLOT && rule.is_attachment() {
            fill_once(&mut position, value, element, &name)?;
        } else if name == CONTENT_SLOT && rule.is_container() {
            match value {
                Arg::Sequence(items) => fill_once(&mut content, items, element, &name)?,
                other => {
                    return Err(Error::InvalidArgument(format!(
                        "content of `{element}` must be a sequence, got {}",
                        other.describe()
                    )));
                }
            }
        } else {
            return Err(Error::InvalidArgument(format!(
                "`{element}` has no parameter `{name}`"
            )));
        }
    }

    let mut positional = arguments.positional;
    if rule.is_container() && content.is_none() {
        let found = positional.iter().position(|a| matches!(a, Arg::Sequence(_)));
        if let Some(Arg::Sequence(items)) = found.map(|i| positional.remove(i)) {
            content = Some(items);
        }
    }

    let mut remaining = positional.into_iter();
    for slot in slots.iter_mut().filter(|slot| slot.is_none()) {
        match remaining.next() {
            Some(value) => *slot = Some(value),
            None => break,
        }
    }
    if rule.is_attachment() && position.is_none() {
        position = remaining.next();
    }
    if let Some(extra) = remaining.next() {
        return Err(Error::TooManyArguments {
            element: element.to_string(),
            value: extra.describe(),
        });
    }

    if let Some((parameter, _)) = rule
        .parameters
        .iter()
        .zip(&slots)
        .find(|(parameter, slot)| !parameter.optional && slot.is_none())
    {
        return Err(Error::MissingArgument {
            element: element.to_string(),
            parameter: parameter.name.clone(),
        });
    }

    let mut parameters = Vec::new();
    for (parameter, slot) in rule.parameters.iter().zip(slots) {
        if let Some(value) = slot {
            parameters.push((parameter.name.clone(), check_value(element, parameter, value)?));
        }
    }

    let children = match rule.content {
        Some(_) => {
            let children = content.unwrap_or_default();
            for child in &children {
                check_child(rule, child)?;
            }
            Some(children)
        }
        None => None,
    };

    let position = match position {
        Some(value) => check_position(element, value)?,
        None => Position::None,
    };

    trace!(
        element,
        parameters = parameters.len(),
        children = children.as_ref().map_or(0, Vec::len),
        position = position.as_str(),
        "Resolved arguments"
    );

    Ok(Resolved {
        parameters,
        position,
        children,
    })
}

fn fill_once<T>(slot: &mut Option<T>, value: T, element: &str, name: &str) -> Result<()> {
    if slot.is_some() {
        return Err(Error::InvalidArgument(format!(
            "`{element}` got argument `{name}` more than once"
        )));
    }
    *slot = Some(value);
    Ok(())
}

/// Checks a value against the declared kind of `parameter`.
pub(crate) fn check_value(element: &str, parameter: &Parameter, value: Arg) -> Result<ParamValue> {
    match (parameter.kind, value) {
        (ParamKind::Any, Arg::Leaf(leaf)) => Ok(ParamValue::Leaf(leaf)),
        (ParamKind::Any, Arg::Element(item)) => Ok(ParamValue::Element(item)),
        (ParamKind::Leaf(kind), Arg::Leaf(leaf)) if kind.accepts(leaf.kind()) => {
            Ok(ParamValue::Leaf(leaf))
        }
        (ParamKind::Node(categories), Arg::Element(item))
            if categories.intersects(item.categories()) =>
        {
            Ok(ParamValue::Element(item))
        }
        (kind, value) => Err(Error::InvalidArgument(format!(
            "`{}` of `{element}` expects {kind}, got {}",
            parameter.name,
            value.describe()
        ))),
    }
}

/// Checks that `rule` is a container whose content accepts `child`.
pub(crate) fn check_child(rule: &SchemaRule, child: &Element) -> Result<()> {
    let Some(allowed) = rule.content else {
        return Err(Error::NotAContainer(rule.name.clone()));
    };
    let actual = child.categories();
    if !allowed.intersects(actual) {
        return Err(Error::InvalidContent {
            element: rule.name.clone(),
            allowed,
            actual: actual.to_string(),
        });
    }
    Ok(())
}

fn check_position(element: &str, value: Arg) -> Result<Position> {
    let parsed = match &value {
        Arg::Position(position) => Some(*position),
        Arg::Leaf(leaf) => leaf.as_text().and_then(|text| text.parse().ok()),
        _ => None,
    };
    parsed.ok_or_else(|| {
        Error::InvalidArgument(format!(
            "position of `{element}` must be none, up, down or neutral, got {}",
            value.describe()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, CategorySet, LeafKind};

    fn markup() -> CategorySet {
        CategorySet::from_slice(&[Category::Markup, Category::Attachment])
    }

    fn with_color() -> SchemaRule {
        SchemaRule::container("with_color", "\\with-color", markup(), markup())
            .with_parameter(Parameter::required("color", ParamKind::Leaf(LeafKind::Color)))
    }

    fn text(word: &str) -> Element {
        MarkupText::new(word).into()
    }

    fn red() -> LeafValue {
        LeafValue::color("red").unwrap()
    }

    #[test]
    fn test_named_value_takes_precedence() {
        let args = Arguments::new()
            .arg(vec![text("a")])
            .named("color", red());
        let resolved = resolve(&with_color(), args).unwrap();
        assert_eq!(resolved.parameters, vec![("color".into(), ParamValue::Leaf(red()))]);
        assert_eq!(resolved.children, Some(vec![text("a")]));
    }

    #[test]
    fn test_positional_fills_position_slot() {
        let args = Arguments::new().arg(red()).arg(LeafValue::string("up"));
        let resolved = resolve(&with_color(), args).unwrap();
        assert_eq!(resolved.position, Position::Up);
        assert_eq!(resolved.children, Some(Vec::new()));
    }

    #[test]
    fn test_bad_position_token() {
        let args = Arguments::new().arg(red()).arg(LeafValue::string("sideways"));
        assert!(matches!(
            resolve(&with_color(), args),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unknown_named_argument() {
        let args = Arguments::new().arg(red()).named("size", LeafValue::signed_int(2));
        let err = resolve(&with_color(), args).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArgument("`with_color` has no parameter `size`".into())
        );
    }

    #[test]
    fn test_duplicate_named_argument() {
        let args = Arguments::new().named("color", red()).named("color", red());
        assert!(matches!(
            resolve(&with_color(), args),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_named_content_must_be_sequence() {
        let args = Arguments::new().arg(red()).named("content", text("a"));
        assert!(matches!(
            resolve(&with_color(), args),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_wrong_leaf_kind() {
        let args = Arguments::new().arg(LeafValue::signed_int(3));
        let err = resolve(&with_color(), args).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArgument(
                "`color` of `with_color` expects color, got signed-int value #3".into()
            )
        );
    }

    #[test]
    fn test_content_category_mismatch() {
        let music = Element::from(Tone::rest("4").unwrap());
        let args = Arguments::new().arg(red()).content(vec![music]);
        assert_eq!(
            resolve(&with_color(), args).unwrap_err(),
            Error::InvalidContent {
                element: "with_color".into(),
                allowed: markup(),
                actual: "music".into(),
            }
        );
    }

    #[test]
    fn test_leaf_command_binds_sequence_to_parameter() {
        let rule = SchemaRule::command("hspace", "\\hspace", markup())
            .with_parameter(Parameter::required("amount", ParamKind::Leaf(LeafKind::SignedFloat)));
        let args = Arguments::new().arg(vec![text("a")]);
        assert!(matches!(resolve(&rule, args), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_node_parameter_checks_categories() {
        let rule = SchemaRule::command("stencil", "\\stencil", markup())
            .with_parameter(Parameter::required(
                "arg",
                ParamKind::Node(CategorySet::single(Category::Markup)),
            ));
        assert!(resolve(&rule, Arguments::new().arg(text("x"))).is_ok());

        let rest = Tone::rest("4").unwrap();
        assert!(matches!(
            resolve(&rule, Arguments::new().arg(rest)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_any_rejects_sequence() {
        let rule = SchemaRule::command("override", "\\override", markup())
            .with_parameter(Parameter::required("value", ParamKind::Any));
        assert!(resolve(&rule, Arguments::new().arg(LeafValue::boolean(true))).is_ok());
        assert!(resolve(&rule, Arguments::new().arg(text("x"))).is_ok());
        assert!(matches!(
            resolve(&rule, Arguments::new().arg(Vec::<Element>::new())),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_optional_parameter_may_stay_unbound() {
        let rule = SchemaRule::command("bar", "\\bar", CategorySet::single(Category::Music))
            .with_parameter(Parameter::optional("kind", ParamKind::Leaf(LeafKind::String)));
        let resolved = resolve(&rule, Arguments::new()).unwrap();
        assert!(resolved.parameters.is_empty());
        assert_eq!(resolved.children, None);
    }
}
