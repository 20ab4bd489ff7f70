//! Error types for schema registration and tree construction.
//!
//! Two enums cover every failure mode of the core:
//!
//! - [`SchemaError`]: a rule handed to
//!   [`SchemaRegistry::register`](crate::SchemaRegistry::register) is
//!   malformed, or collides with one that is already registered.
//! - [`Error`]: building or mutating a tree violated a rule: a missing or
//!   surplus argument, a value of the wrong kind, a child of the wrong
//!   category, or a list operation on a leaf command.
//!
//! Every error is raised at the point of violation. Formatting a tree never
//! fails, because nothing reaches the tree without passing validation first.

use thiserror::Error;

use crate::CategorySet;

/// Malformed schema rule or catalog definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Element name is not an identifier (`[A-Za-z_][A-Za-z0-9_]*`).
    #[error("invalid element name: {0:?}")]
    InvalidName(String),
    /// Tag contains characters outside the tag alphabet.
    #[error("invalid tag for `{element}`: {tag:?}")]
    InvalidTag { element: String, tag: String },
    /// Parameter name is not an identifier (`[A-Za-z][A-Za-z0-9_]*`).
    #[error("invalid parameter name in `{element}`: {parameter:?}")]
    InvalidParameterName { element: String, parameter: String },
    /// Two parameters of the same rule share a name.
    #[error("duplicate parameter in `{element}`: {parameter}")]
    DuplicateParameter { element: String, parameter: String },
    /// Parameter named like the implicit `position` or `content` slot.
    #[error("parameter `{parameter}` of `{element}` shadows the implicit slot of the same name")]
    ReservedParameter { element: String, parameter: String },
    /// Delimiter text spans more than one line.
    #[error("invalid delimiter for `{element}`: {delimiter:?}")]
    InvalidDelimiter { element: String, delimiter: String },
    /// A rule with this name is already registered.
    #[error("element already registered: {0}")]
    DuplicateElement(String),
    /// Label outside the closed category vocabulary.
    #[error("unknown category: {0:?}")]
    UnknownCategory(String),
    /// Label that names no leaf value kind.
    #[error("unknown value kind: {0:?}")]
    UnknownKind(String),
}

/// Tree construction and mutation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Schema registration failure.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// No rule is registered under this name.
    #[error("unknown element: {0}")]
    UnknownElement(String),

    /// A required parameter was left unbound.
    #[error("`{element}` is missing required argument `{parameter}`")]
    MissingArgument { element: String, parameter: String },

    /// A positional value had no slot left to bind to.
    #[error("too many arguments for `{element}`: nowhere to place {value}")]
    TooManyArguments { element: String, value: String },

    /// A value does not belong to the expected kind or token set.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A child carries none of the categories its container accepts.
    #[error("invalid content for `{element}`: expected {allowed}, got {actual}")]
    InvalidContent {
        element: String,
        allowed: CategorySet,
        actual: String,
    },

    /// List-like operation attempted on a leaf command.
    #[error("`{0}` is not a container")]
    NotAContainer(String),

    /// Child index outside the container.
    #[error("index {index} out of range for `{element}` with {len} children")]
    IndexOutOfRange {
        element: String,
        index: usize,
        len: usize,
    },

    /// The searched child is not in the container.
    #[error("child not found in `{0}`")]
    ChildNotFound(String),

    /// Pitch name is not a note name with accidentals.
    #[error("invalid pitch: {0:?}")]
    InvalidPitch(String),

    /// Octave marks are not a run of `'` or `,`.
    #[error("invalid octave: {0:?}")]
    InvalidOctave(String),

    /// Duration is not a number followed by dots.
    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    #[test]
    fn test_schema_error_converts() {
        let err: Error = SchemaError::DuplicateElement("bold".into()).into();
        assert_eq!(err.to_string(), "element already registered: bold");
    }

    #[test]
    fn test_invalid_content_message() {
        let err = Error::InvalidContent {
            element: "markup".into(),
            allowed: CategorySet::from_slice(&[Category::Markup, Category::Comment]),
            actual: "music".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid content for `markup`: expected markup, comment, got music"
        );
    }
}
