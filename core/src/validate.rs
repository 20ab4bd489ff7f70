//! Schema rule validation.
//!
//! Checks the structural invariants of a [`SchemaRule`] before it enters a
//! registry: identifier syntax for names, the tag alphabet, unique parameter
//! names that do not shadow the implicit slots, and single-line delimiters.
//! Category labels need no check here; [`CategorySet`](crate::CategorySet)
//! can only hold members of the closed vocabulary.
//!
//! # Examples
//!
//! ```
//! use lilyflower_core::*;
//!
//! let markup = CategorySet::single(Category::Markup);
//! assert!(validate_rule(&SchemaRule::command("bold", "\\bold", markup)).is_ok());
//!
//! // Invalid: element names are identifiers
//! let bad = SchemaRule::command("bold-face", "\\bold", markup);
//! assert_eq!(validate_rule(&bad), Err(SchemaError::InvalidName("bold-face".into())));
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::SchemaError;
use crate::schema::{CONTENT_SLOT, POSITION_SLOT, SchemaRule};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex must compile"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\\/_%-]*$").expect("static regex must compile"));
static PARAMETER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("static regex must compile"));

/// Validates a single rule.
///
/// Returns the first violation found.
pub fn validate_rule(rule: &SchemaRule) -> Result<(), SchemaError> {
    if !NAME_RE.is_match(&rule.name) {
        return Err(SchemaError::InvalidName(rule.name.clone()));
    }

    if !TAG_RE.is_match(&rule.tag) {
        return Err(SchemaError::InvalidTag {
            element: rule.name.clone(),
            tag: rule.tag.clone(),
        });
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for parameter in &rule.parameters {
        let name = parameter.name.as_str();
        if !PARAMETER_RE.is_match(name) {
            return Err(SchemaError::InvalidParameterName {
                element: rule.name.clone(),
                parameter: name.to_string(),
            });
        }
        if (name == POSITION_SLOT && rule.is_attachment())
            || (name == CONTENT_SLOT && rule.is_container())
        {
            return Err(SchemaError::ReservedParameter {
                element: rule.name.clone(),
                parameter: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(SchemaError::DuplicateParameter {
                element: rule.name.clone(),
                parameter: name.to_string(),
            });
        }
    }

    for delimiter in [&rule.delimiter_open, &rule.delimiter_close] {
        if delimiter.contains(['\n', '\r']) {
            return Err(SchemaError::InvalidDelimiter {
                element: rule.name.clone(),
                delimiter: delimiter.clone(),
            });
        }
    }

    Ok(())
}
