//! Typed Scheme literals used as argument values.
//!
//! A [`LeafValue`] is validated once, at construction, and is immutable
//! afterwards. It renders in two forms:
//!
//! - [`nested`](LeafValue::nested): the bare datum, as it appears inside a
//!   pair or list;
//! - [`format_top_level`](LeafValue::format_top_level): the datum as a
//!   standalone argument, prefixed with `#` (and a quote for pairs, lists
//!   and association lists).
//!
//! # Examples
//!
//! ```
//! use lilyflower_core::LeafValue;
//!
//! let five = LeafValue::unsigned_int(5).unwrap();
//! assert_eq!(five.format_top_level(), "#5");
//!
//! let offset = LeafValue::pair(LeafValue::signed_int(5), LeafValue::signed_int(0));
//! assert_eq!(offset.nested(), "(5 . 0)");
//! assert_eq!(offset.format_top_level(), "#'(5 . 0)");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Error, Result, SchemaError};

static SYMBOL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_!$%&*/:<=>?^~][A-Za-z0-9_!$%&*/:<=>?^~+.@-]*$")
        .expect("static regex must compile")
});

/// Prefix that turns a datum into a top-level Scheme argument.
pub const SCHEME_MARKER: &str = "#";

/// Quote placed between the marker and a quoted datum.
pub const QUOTE_MARKER: &str = "'";

/// Variant of a [`LeafValue`], as named in schema declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeafKind {
    Boolean,
    UnsignedInt,
    SignedInt,
    UnsignedFloat,
    SignedFloat,
    String,
    Symbol,
    Direction,
    Axis,
    Color,
    Pair,
    List,
    AssociationList,
    Procedure,
}

impl LeafKind {
    pub const ALL: [LeafKind; 14] = [
        LeafKind::Boolean,
        LeafKind::UnsignedInt,
        LeafKind::SignedInt,
        LeafKind::UnsignedFloat,
        LeafKind::SignedFloat,
        LeafKind::String,
        LeafKind::Symbol,
        LeafKind::Direction,
        LeafKind::Axis,
        LeafKind::Color,
        LeafKind::Pair,
        LeafKind::List,
        LeafKind::AssociationList,
        LeafKind::Procedure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeafKind::Boolean => "boolean",
            LeafKind::UnsignedInt => "unsigned-int",
            LeafKind::SignedInt => "signed-int",
            LeafKind::UnsignedFloat => "unsigned-float",
            LeafKind::SignedFloat => "signed-float",
            LeafKind::String => "string",
            LeafKind::Symbol => "symbol",
            LeafKind::Direction => "direction",
            LeafKind::Axis => "axis",
            LeafKind::Color => "color",
            LeafKind::Pair => "pair",
            LeafKind::List => "list",
            LeafKind::AssociationList => "association-list",
            LeafKind::Procedure => "procedure",
        }
    }

    /// Returns `true` if a value of kind `actual` satisfies a slot of this
    /// kind.
    ///
    /// Directions count as signed floats, axes as signed integers and
    /// association lists as lists; everything else must match exactly.
    ///
    /// # Examples
    ///
    /// ```
    /// use lilyflower_core::LeafKind;
    ///
    /// assert!(LeafKind::List.accepts(LeafKind::AssociationList));
    /// assert!(!LeafKind::AssociationList.accepts(LeafKind::List));
    /// assert!(LeafKind::SignedFloat.accepts(LeafKind::Direction));
    /// ```
    pub fn accepts(self, actual: LeafKind) -> bool {
        self == actual
            || matches!(
                (self, actual),
                (LeafKind::SignedFloat, LeafKind::Direction)
                    | (LeafKind::SignedInt, LeafKind::Axis)
                    | (LeafKind::List, LeafKind::AssociationList)
            )
    }

    /// Returns `true` for kinds whose top-level form is quoted.
    pub fn is_quoted(self) -> bool {
        matches!(
            self,
            LeafKind::Pair | LeafKind::List | LeafKind::AssociationList
        )
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeafKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        LeafKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownKind(s.to_string()))
    }
}

/// Vertical or horizontal direction constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Center,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Center => "CENTER",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" | "Up" | "UP" => Ok(Direction::Up),
            "down" | "Down" | "DOWN" => Ok(Direction::Down),
            "center" | "Center" | "CENTER" => Ok(Direction::Center),
            _ => Err(Error::InvalidArgument(format!(
                "expected up, down or center, not {s:?}"
            ))),
        }
    }
}

/// Axis constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            _ => Err(Error::InvalidArgument(format!("expected X or Y, not {s:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Repr {
    Boolean(bool),
    UnsignedInt(u64),
    SignedInt(i64),
    UnsignedFloat(f64),
    SignedFloat(f64),
    String(String),
    Symbol(String),
    Direction(Direction),
    Axis(Axis),
    Color(Color),
    Pair(Box<LeafValue>, Box<LeafValue>),
    List(Vec<LeafValue>),
    AssociationList(Vec<LeafValue>),
    Procedure(String),
}

/// A validated, immutable Scheme literal.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafValue(Repr);

impl LeafValue {
    pub fn boolean(value: bool) -> Self {
        Self(Repr::Boolean(value))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for negative values.
    pub fn unsigned_int(value: i64) -> Result<Self> {
        let value = u64::try_from(value)
            .map_err(|_| Error::InvalidArgument(format!("{value} is smaller than zero")))?;
        Ok(Self(Repr::UnsignedInt(value)))
    }

    pub fn signed_int(value: i64) -> Self {
        Self(Repr::SignedInt(value))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for negative or non-finite values.
    pub fn unsigned_float(value: f64) -> Result<Self> {
        let value = finite(value)?;
        if value < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "{value:?} is smaller than zero"
            )));
        }
        Ok(Self(Repr::UnsignedFloat(value)))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for non-finite values.
    pub fn signed_float(value: f64) -> Result<Self> {
        Ok(Self(Repr::SignedFloat(finite(value)?)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self(Repr::String(value.into()))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `name` is not a Scheme symbol.
    pub fn symbol(name: &str) -> Result<Self> {
        if !SYMBOL_RE.is_match(name) {
            return Err(Error::InvalidArgument(format!(
                "{name:?} is not a valid symbol"
            )));
        }
        Ok(Self(Repr::Symbol(name.to_string())))
    }

    /// Parses `up`, `down` or `center` in lower, title or upper case.
    pub fn direction(token: &str) -> Result<Self> {
        Ok(Self(Repr::Direction(token.parse()?)))
    }

    /// Parses `x` or `y` in either case.
    pub fn axis(token: &str) -> Result<Self> {
        Ok(Self(Repr::Axis(token.parse()?)))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for unknown color names.
    pub fn color(name: &str) -> Result<Self> {
        Ok(Self(Repr::Color(Color::parse(name)?)))
    }

    pub fn pair(first: LeafValue, second: LeafValue) -> Self {
        Self(Repr::Pair(Box::new(first), Box::new(second)))
    }

    /// Builds a pair from a sequence that must hold exactly two values.
    pub fn pair_from(items: Vec<LeafValue>) -> Result<Self> {
        let len = items.len();
        match <[LeafValue; 2]>::try_from(items) {
            Ok([first, second]) => Ok(Self::pair(first, second)),
            Err(_) => Err(Error::InvalidArgument(format!(
                "a pair needs exactly 2 values, got {len}"
            ))),
        }
    }

    pub fn list(items: Vec<LeafValue>) -> Self {
        Self(Repr::List(items))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if any member is not a pair.
    pub fn association_list(items: Vec<LeafValue>) -> Result<Self> {
        if let Some(item) = items.iter().find(|item| item.kind() != LeafKind::Pair) {
            return Err(Error::InvalidArgument(format!(
                "association list member {} is not a pair",
                item.nested()
            )));
        }
        Ok(Self(Repr::AssociationList(items)))
    }

    /// Wraps a Scheme expression evaluating to a procedure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for blank expressions or
    /// unbalanced parentheses.
    pub fn procedure(expression: &str) -> Result<Self> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(Error::InvalidArgument("empty procedure expression".into()));
        }
        if !balanced(expression) {
            return Err(Error::InvalidArgument(format!(
                "unbalanced parentheses in {expression:?}"
            )));
        }
        Ok(Self(Repr::Procedure(expression.to_string())))
    }

    pub fn kind(&self) -> LeafKind {
        match &self.0 {
            Repr::Boolean(_) => LeafKind::Boolean,
            Repr::UnsignedInt(_) => LeafKind::UnsignedInt,
            Repr::SignedInt(_) => LeafKind::SignedInt,
            Repr::UnsignedFloat(_) => LeafKind::UnsignedFloat,
            Repr::SignedFloat(_) => LeafKind::SignedFloat,
            Repr::String(_) => LeafKind::String,
            Repr::Symbol(_) => LeafKind::Symbol,
            Repr::Direction(_) => LeafKind::Direction,
            Repr::Axis(_) => LeafKind::Axis,
            Repr::Color(_) => LeafKind::Color,
            Repr::Pair(..) => LeafKind::Pair,
            Repr::List(_) => LeafKind::List,
            Repr::AssociationList(_) => LeafKind::AssociationList,
            Repr::Procedure(_) => LeafKind::Procedure,
        }
    }

    /// Text content of strings and symbols.
    pub fn as_text(&self) -> Option<&str> {
        match &self.0 {
            Repr::String(text) | Repr::Symbol(text) => Some(text),
            _ => None,
        }
    }

    /// The datum as it appears inside a compound value.
    pub fn nested(&self) -> String {
        match &self.0 {
            Repr::Boolean(true) => "t".to_string(),
            Repr::Boolean(false) => "f".to_string(),
            Repr::UnsignedInt(value) => value.to_string(),
            Repr::SignedInt(value) => value.to_string(),
            Repr::UnsignedFloat(value) | Repr::SignedFloat(value) => format!("{value:?}"),
            Repr::String(text) => quote_string(text),
            Repr::Symbol(name) => name.clone(),
            Repr::Direction(direction) => direction.as_str().to_string(),
            Repr::Axis(axis) => axis.as_str().to_string(),
            Repr::Color(color) => color.nested(),
            Repr::Pair(first, second) => format!("({} . {})", first.nested(), second.nested()),
            Repr::List(items) | Repr::AssociationList(items) => {
                let inner: Vec<String> = items.iter().map(LeafValue::nested).collect();
                format!("({})", inner.join(" "))
            }
            Repr::Procedure(expression) => expression.clone(),
        }
    }

    /// The datum as a standalone argument.
    pub fn format_top_level(&self) -> String {
        if self.kind().is_quoted() {
            format!("{SCHEME_MARKER}{QUOTE_MARKER}{}", self.nested())
        } else {
            format!("{SCHEME_MARKER}{}", self.nested())
        }
    }
}

impl fmt::Display for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_top_level())
    }
}

impl From<bool> for LeafValue {
    fn from(value: bool) -> Self {
        Self::boolean(value)
    }
}

impl From<Direction> for LeafValue {
    fn from(direction: Direction) -> Self {
        Self(Repr::Direction(direction))
    }
}

impl From<Axis> for LeafValue {
    fn from(axis: Axis) -> Self {
        Self(Repr::Axis(axis))
    }
}

impl From<Color> for LeafValue {
    fn from(color: Color) -> Self {
        Self(Repr::Color(color))
    }
}

fn finite(value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::InvalidArgument(format!("{value} is not a finite number")));
    }
    // -0.0 renders as "-0.0"; Scheme treats both zeros alike.
    Ok(if value == 0.0 { 0.0 } else { value })
}

fn balanced(expression: &str) -> bool {
    let mut depth = 0usize;
    for c in expression.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Renders `text` as a double-quoted string literal.
pub(crate) fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
