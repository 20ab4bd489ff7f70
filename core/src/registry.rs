//! The authoritative table of element rules.
//!
//! [`SchemaRegistry`] keeps rules in registration order with O(1) lookup by
//! name. It is filled once at start-up and read-only afterwards: a name can
//! be registered only once, so the table never silently changes meaning.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result, SchemaError};
use crate::node::Node;
use crate::resolve::Arguments;
use crate::schema::SchemaRule;
use crate::validate::validate_rule;

/// Ordered mapping from element name to [`SchemaRule`].
///
/// # Examples
///
/// ```
/// use lilyflower_core::*;
///
/// let markup = CategorySet::from_slice(&[Category::Markup, Category::Attachment]);
/// let content = CategorySet::single(Category::Markup);
///
/// let mut registry = SchemaRegistry::new();
/// registry.register(SchemaRule::container("bold", "\\bold", markup, content)).unwrap();
/// registry.register(SchemaRule::command("fermata", "\\fermata", markup)).unwrap();
///
/// let fermata = registry.node("fermata", Arguments::new()).unwrap();
/// let bold = registry.node("bold", Arguments::new().content(vec![fermata.into()])).unwrap();
/// assert_eq!(bold.format(0), "\\bold { \\fermata }");
///
/// assert!(matches!(registry.lookup("italic"), Err(Error::UnknownElement(_))));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    rules: Vec<Arc<SchemaRule>>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and adds a rule.
    ///
    /// # Errors
    ///
    /// Returns the [`SchemaError`] reported by
    /// [`validate_rule`](crate::validate_rule), or
    /// [`SchemaError::DuplicateElement`] if the name is already taken.
    pub fn register(
        &mut self,
        rule: SchemaRule,
    ) -> std::result::Result<Arc<SchemaRule>, SchemaError> {
        validate_rule(&rule)?;
        if self.index.contains_key(&rule.name) {
            return Err(SchemaError::DuplicateElement(rule.name));
        }

        debug!(
            element = %rule.name,
            tag = %rule.tag,
            container = rule.is_container(),
            "Registered rule"
        );
        let rule = Arc::new(rule);
        self.index.insert(rule.name.clone(), self.rules.len());
        self.rules.push(Arc::clone(&rule));
        Ok(rule)
    }

    /// Looks up a rule by element name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownElement`] if no rule has this name.
    pub fn lookup(&self, name: &str) -> Result<&Arc<SchemaRule>> {
        self.get(name)
            .ok_or_else(|| Error::UnknownElement(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<SchemaRule>> {
        self.index.get(name).map(|&i| &self.rules[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<SchemaRule>> {
        self.rules.iter()
    }

    /// Element names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    /// Builds a node of the named element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownElement`] for unregistered names, or any
    /// resolution error from [`Node::new`].
    pub fn node(&self, name: &str, arguments: Arguments) -> Result<Node> {
        let rule = self.lookup(name)?;
        Node::new(Arc::clone(rule), arguments)
    }
}
