//! Declarative rules describing what each element accepts.
//!
//! A [`SchemaRule`] names an element, gives the tag it renders as, lists the
//! categories it carries, declares its parameters in order, and says whether
//! it holds children (and of which categories). Rules are plain data; they
//! are checked when handed to
//! [`SchemaRegistry::register`](crate::SchemaRegistry::register).

use std::fmt;

use serde::Serialize;

use crate::category::{Category, CategorySet};
use crate::leaf::LeafKind;

/// Name of the implicit slot holding an attachment's position marker.
pub const POSITION_SLOT: &str = "position";

/// Name of the implicit slot holding a container's children.
pub const CONTENT_SLOT: &str = "content";

pub const DEFAULT_DELIMITER_OPEN: &str = "{";
pub const DEFAULT_DELIMITER_CLOSE: &str = "}";

/// What a parameter slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    /// Any leaf value or element.
    Any,
    /// A leaf value of this kind (or one of its sub-kinds).
    Leaf(LeafKind),
    /// An element carrying at least one of these categories.
    Node(CategorySet),
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Any => f.write_str("anything"),
            ParamKind::Leaf(kind) => write!(f, "{kind}"),
            ParamKind::Node(categories) => write!(f, "element of {categories}"),
        }
    }
}

/// One declared parameter of a rule.
///
/// # Examples
///
/// ```
/// use lilyflower_core::{LeafKind, ParamKind, Parameter};
///
/// let size = Parameter::required("size", ParamKind::Leaf(LeafKind::SignedFloat));
/// assert!(!size.optional);
/// let label = Parameter::optional("label", ParamKind::Any);
/// assert!(label.optional);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    pub optional: bool,
}

impl Parameter {
    pub fn required(name: &str, kind: ParamKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            optional: false,
        }
    }

    pub fn optional(name: &str, kind: ParamKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            optional: true,
        }
    }
}

/// Definition of one element kind.
///
/// Build a rule with [`command`](SchemaRule::command) (no children) or
/// [`container`](SchemaRule::container), then chain the `with_*` builders.
///
/// # Examples
///
/// ```
/// use lilyflower_core::{Category, CategorySet, LeafKind, ParamKind, Parameter, SchemaRule};
///
/// let markup = CategorySet::from_slice(&[Category::Markup, Category::Attachment]);
/// let content = CategorySet::from_slice(&[Category::Markup, Category::Comment]);
///
/// let rule = SchemaRule::container("with_color", "\\with-color", markup, content)
///     .with_parameter(Parameter::required("color", ParamKind::Leaf(LeafKind::Color)))
///     .with_inline(true);
///
/// assert!(rule.is_container());
/// assert!(rule.is_attachment());
/// assert_eq!(rule.slot_names(), vec!["color", "position", "content"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaRule {
    /// Registry key (an identifier).
    pub name: String,
    /// Text the element renders as, e.g. `\bold`.
    pub tag: String,
    /// Categories the element itself carries.
    pub categories: CategorySet,
    /// Declared parameters, in binding order.
    pub parameters: Vec<Parameter>,
    /// Categories accepted as children; `None` for leaf commands.
    pub content: Option<CategorySet>,
    /// Whether the element glues to an adjacent inline sibling.
    pub inline: bool,
    pub delimiter_open: String,
    pub delimiter_close: String,
}

impl SchemaRule {
    /// Creates a leaf command rule.
    pub fn command(name: &str, tag: &str, categories: CategorySet) -> Self {
        Self {
            name: name.to_string(),
            tag: tag.to_string(),
            categories,
            parameters: Vec::new(),
            content: None,
            inline: false,
            delimiter_open: DEFAULT_DELIMITER_OPEN.to_string(),
            delimiter_close: DEFAULT_DELIMITER_CLOSE.to_string(),
        }
    }

    /// Creates a container rule accepting children of `content`.
    pub fn container(
        name: &str,
        tag: &str,
        categories: CategorySet,
        content: CategorySet,
    ) -> Self {
        Self {
            content: Some(content),
            ..Self::command(name, tag, categories)
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    pub fn with_delimiters(mut self, open: &str, close: &str) -> Self {
        self.delimiter_open = open.to_string();
        self.delimiter_close = close.to_string();
        self
    }

    /// Returns `true` if the rule holds children, even if none are allowed.
    pub fn is_container(&self) -> bool {
        self.content.is_some()
    }

    /// Returns `true` if elements of this rule take a position marker.
    pub fn is_attachment(&self) -> bool {
        self.categories.contains(Category::Attachment)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Names of every slot in binding order: declared parameters, then
    /// `position` for attachments, then `content` for containers.
    pub fn slot_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();
        if self.is_attachment() {
            names.push(POSITION_SLOT);
        }
        if self.is_container() {
            names.push(CONTENT_SLOT);
        }
        names
    }
}
