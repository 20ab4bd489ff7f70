//! Validated element trees and the pretty-printer for generated LilyPond
//! sources.
//!
//! This crate defines the building blocks of a score:
//!
//! - [`LeafValue`]: a typed Scheme literal (numbers, strings, symbols,
//!   directions, colors, pairs, lists) with its nested and top-level forms.
//! - [`SchemaRule`]: what one element kind accepts: its tag, categories,
//!   parameters, content and layout flags.
//! - [`SchemaRegistry`]: the ordered, validated table of rules.
//! - [`Node`]: an element bound to a rule, built by resolving
//!   [`Arguments`] and mutated through list-like operations.
//! - [`PairToggle`], [`Tone`], [`MarkupText`] and [`Comment`]: the other
//!   [`Element`]s a tree can hold.
//! - [`Document`]: the file-level root.
//!
//! Every value is checked when it enters the tree, so formatting never
//! fails. Rule tables are normally loaded from YAML by the
//! `lilyflower-catalog` crate.
//!
//! # Example
//!
//! ```
//! use lilyflower_core::*;
//!
//! let markup = CategorySet::from_slice(&[Category::Markup, Category::Attachment]);
//! let mut registry = SchemaRegistry::new();
//! registry
//!     .register(
//!         SchemaRule::container("with_color", "\\with-color", markup, markup)
//!             .with_parameter(Parameter::required("color", ParamKind::Leaf(LeafKind::Color)))
//!             .with_inline(true),
//!     )
//!     .unwrap();
//! registry.register(SchemaRule::container("markup", "\\markup", markup, markup)).unwrap();
//!
//! let red = registry
//!     .node(
//!         "with_color",
//!         Arguments::new()
//!             .arg(LeafValue::color("darkred").unwrap())
//!             .content(vec![MarkupText::new("dolce").into()]),
//!     )
//!     .unwrap();
//! let text = registry
//!     .node("markup", Arguments::new().content(vec![red.into(), MarkupText::new("e").into()]))
//!     .unwrap();
//!
//! assert_eq!(
//!     text.format(0),
//!     "\\markup {\n  \\with-color #darkred { dolce } e\n}"
//! );
//! ```

mod category;
mod color;
mod element;
mod error;
mod format;
mod help;
mod leaf;
mod node;
mod registry;
mod resolve;
mod schema;
mod toggle;
mod tone;
mod validate;

pub use category::{Category, CategorySet};
pub use color::{Color, ColorFamily, NORMAL_COLORS, X11_COLORS, X11_NUMBERED_BASES};
pub use element::{Comment, Element, MarkupText};
pub use error::{Error, Result, SchemaError};
pub use format::{Document, INDENT_UNIT};
pub use help::{describe, display_name};
pub use leaf::{Axis, Direction, LeafKind, LeafValue, QUOTE_MARKER, SCHEME_MARKER};
pub use node::{Node, ParamValue, Position};
pub use registry::SchemaRegistry;
pub use resolve::{Arg, Arguments};
pub use schema::{
    CONTENT_SLOT, DEFAULT_DELIMITER_CLOSE, DEFAULT_DELIMITER_OPEN, POSITION_SLOT, ParamKind,
    Parameter, SchemaRule,
};
pub use toggle::PairToggle;
pub use tone::{Pitch, Tone};
pub use validate::validate_rule;
