//! YAML catalog files.
//!
//! A catalog lists element definitions that convert one-to-one into
//! [`SchemaRule`]s.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! elements:
//!   - name: with_color
//!     tag: '\with-color'
//!     categories: [markup, attachment]
//!     parameters:
//!       - name: color
//!         kind: color
//!     content: [markup, comment, setting, variable]
//!     inline: true
//!   - name: parallel
//!     tag: ''
//!     categories: [music]
//!     content: [music, comment]
//!     delimiter_open: '<<'
//!     delimiter_close: '>>'
//! ```
//!
//! A parameter `kind` is `any`, a value kind label such as `signed-float`,
//! or a list of categories. Leaving out `content` makes a leaf command;
//! `content: []` makes a container that accepts nothing.

use std::io::{BufReader, BufWriter};
use std::path::Path;

use lilyflower_core::{
    Category, CategorySet, DEFAULT_DELIMITER_CLOSE, DEFAULT_DELIMITER_OPEN, ParamKind, Parameter,
    SchemaError, SchemaRegistry, SchemaRule,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, Result};

/// Catalog format version written by [`CatalogFile::new`].
pub const CATALOG_VERSION: &str = "1.0";

const ANY_KIND: &str = "any";

/// Parameter kind as written in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KindDefinition {
    /// `any` or a value kind label.
    Label(String),
    /// Categories an element argument must intersect.
    Categories(Vec<String>),
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    pub kind: KindDefinition,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}

/// One element definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDefinition {
    pub name: String,
    pub tag: String,
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDefinition>,
    /// Accepted child categories; `None` for leaf commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inline: bool,
    #[serde(default = "default_open", skip_serializing_if = "is_default_open")]
    pub delimiter_open: String,
    #[serde(default = "default_close", skip_serializing_if = "is_default_close")]
    pub delimiter_close: String,
}

impl ElementDefinition {
    /// Converts the definition into a rule, resolving every label.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownCategory`] or
    /// [`SchemaError::UnknownKind`] for labels outside the vocabulary.
    /// Structural checks happen later, in
    /// [`SchemaRegistry::register`].
    pub fn to_rule(&self) -> std::result::Result<SchemaRule, SchemaError> {
        let parameters = self
            .parameters
            .iter()
            .map(|p| {
                Ok(Parameter {
                    name: p.name.clone(),
                    kind: parse_kind(&p.kind)?,
                    optional: p.optional,
                })
            })
            .collect::<std::result::Result<Vec<_>, SchemaError>>()?;

        Ok(SchemaRule {
            name: self.name.clone(),
            tag: self.tag.clone(),
            categories: parse_categories(&self.categories)?,
            parameters,
            content: self.content.as_deref().map(parse_categories).transpose()?,
            inline: self.inline,
            delimiter_open: self.delimiter_open.clone(),
            delimiter_close: self.delimiter_close.clone(),
        })
    }

    /// Writes a rule back out as a definition.
    pub fn from_rule(rule: &SchemaRule) -> Self {
        Self {
            name: rule.name.clone(),
            tag: rule.tag.clone(),
            categories: labels(rule.categories),
            parameters: rule
                .parameters
                .iter()
                .map(|p| ParameterDefinition {
                    name: p.name.clone(),
                    kind: match p.kind {
                        ParamKind::Any => KindDefinition::Label(ANY_KIND.to_string()),
                        ParamKind::Leaf(kind) => KindDefinition::Label(kind.to_string()),
                        ParamKind::Node(categories) => {
                            KindDefinition::Categories(labels(categories))
                        }
                    },
                    optional: p.optional,
                })
                .collect(),
            content: rule.content.map(labels),
            inline: rule.inline,
            delimiter_open: rule.delimiter_open.clone(),
            delimiter_close: rule.delimiter_close.clone(),
        }
    }
}

/// A whole catalog document.
///
/// # Examples
///
/// ```
/// use lilyflower_catalog::CatalogFile;
/// use lilyflower_core::SchemaRegistry;
///
/// let catalog = CatalogFile::from_yaml_str(r#"
/// version: "1.0"
/// elements:
///   - { name: fermata, tag: '\fermata', categories: [markup, attachment] }
/// "#).unwrap();
///
/// let mut registry = SchemaRegistry::new();
/// catalog.register_into(&mut registry, "inline catalog").unwrap();
/// assert_eq!(registry.node("fermata", Default::default()).unwrap().format(0), "\\fermata");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Format version (e.g. `"1.0"`).
    pub version: String,
    #[serde(default)]
    pub elements: Vec<ElementDefinition>,
}

impl CatalogFile {
    pub fn new() -> Self {
        Self {
            version: CATALOG_VERSION.to_string(),
            elements: Vec::new(),
        }
    }

    /// Snapshot of every rule in `registry`, in registration order.
    pub fn from_registry(registry: &SchemaRegistry) -> Self {
        Self {
            version: CATALOG_VERSION.to_string(),
            elements: registry.iter().map(|rule| ElementDefinition::from_rule(rule)).collect(),
        }
    }

    /// Parses a catalog and checks its version.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::YamlError`] for malformed documents or
    /// [`CatalogError::UnsupportedVersion`] unless the major version is 1.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let catalog: CatalogFile = serde_yaml::from_str(yaml)?;
        catalog.check_version()?;
        Ok(catalog)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Loads a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IoError`] if the file cannot be read,
    /// [`CatalogError::YamlError`] if parsing fails, or
    /// [`CatalogError::UnsupportedVersion`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let catalog: CatalogFile = serde_yaml::from_reader(reader)?;
        catalog.check_version()?;
        Ok(catalog)
    }

    /// Saves the catalog as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Registers every definition, in order; `origin` names the catalog in
    /// error messages.
    ///
    /// Returns the number of registered rules.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidDefinition`] for the first definition
    /// the registry rejects. Definitions before it stay registered.
    pub fn register_into(&self, registry: &mut SchemaRegistry, origin: &str) -> Result<usize> {
        for definition in &self.elements {
            definition
                .to_rule()
                .and_then(|rule| registry.register(rule))
                .map_err(|error| CatalogError::InvalidDefinition {
                    origin: origin.to_string(),
                    error,
                })?;
        }
        debug!(origin, count = self.elements.len(), "Registered catalog");
        Ok(self.elements.len())
    }

    fn check_version(&self) -> Result<()> {
        match self.version.split('.').next() {
            Some("1") => Ok(()),
            _ => Err(CatalogError::UnsupportedVersion(self.version.clone())),
        }
    }
}

impl Default for CatalogFile {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_categories(labels: &[String]) -> std::result::Result<CategorySet, SchemaError> {
    labels.iter().map(|label| label.parse::<Category>()).collect()
}

fn parse_kind(kind: &KindDefinition) -> std::result::Result<ParamKind, SchemaError> {
    match kind {
        KindDefinition::Label(label) if label == ANY_KIND => Ok(ParamKind::Any),
        KindDefinition::Label(label) => Ok(ParamKind::Leaf(label.parse()?)),
        KindDefinition::Categories(labels) => Ok(ParamKind::Node(parse_categories(labels)?)),
    }
}

fn labels(categories: CategorySet) -> Vec<String> {
    categories.iter().map(|c| c.as_str().to_string()).collect()
}

fn is_false(value: &bool) -> bool {
    !value
}

fn default_open() -> String {
    DEFAULT_DELIMITER_OPEN.to_string()
}

fn default_close() -> String {
    DEFAULT_DELIMITER_CLOSE.to_string()
}

fn is_default_open(value: &String) -> bool {
    value == DEFAULT_DELIMITER_OPEN
}

fn is_default_close(value: &String) -> bool {
    value == DEFAULT_DELIMITER_CLOSE
}
