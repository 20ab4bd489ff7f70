//! Registry construction from the built-in table and catalog files.
//!
//! ```no_run
//! use lilyflower_catalog::CatalogBuilder;
//!
//! // Built-in elements plus a project catalog
//! let registry = CatalogBuilder::new()
//!     .with_file("elements/custom.yml")
//!     .build()
//!     .unwrap();
//! println!("{} elements", registry.len());
//! ```

use std::path::{Path, PathBuf};

use lilyflower_core::SchemaRegistry;
use tracing::{debug, info};

use crate::definition::CatalogFile;
use crate::error::Result;

const BUILTIN_YAML: &str = include_str!("../data/builtin.yml");

/// Where a catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The table compiled into this crate.
    Builtin,
    /// A YAML file on disk.
    File(PathBuf),
}

impl CatalogSource {
    /// Reads the catalog.
    pub fn load(&self) -> Result<CatalogFile> {
        match self {
            CatalogSource::Builtin => CatalogFile::from_yaml_str(BUILTIN_YAML),
            CatalogSource::File(path) => CatalogFile::load(path),
        }
    }

    /// Name used in log records and error messages.
    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Builtin => "built-in catalog".to_string(),
            CatalogSource::File(path) => path.display().to_string(),
        }
    }
}

/// Parses the built-in catalog.
pub fn builtin_catalog() -> Result<CatalogFile> {
    CatalogSource::Builtin.load()
}

/// Registry holding only the built-in elements.
pub fn builtin_registry() -> Result<SchemaRegistry> {
    CatalogBuilder::new().build()
}

/// Builder for a [`SchemaRegistry`] assembled from several catalogs.
///
/// Sources are registered in the order they were added, starting with the
/// built-in table unless [`without_builtin`](Self::without_builtin) is
/// called. Names must be unique across all of them; a later catalog cannot
/// override an earlier definition.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    builtin: bool,
    files: Vec<PathBuf>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            builtin: true,
            files: Vec::new(),
        }
    }

    /// Leaves out the built-in table.
    pub fn without_builtin(mut self) -> Self {
        self.builtin = false;
        self
    }

    /// Adds a catalog file.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(path.as_ref().to_path_buf());
        self
    }

    /// Sources in registration order.
    pub fn sources(&self) -> Vec<CatalogSource> {
        let builtin = self.builtin.then_some(CatalogSource::Builtin);
        builtin
            .into_iter()
            .chain(self.files.iter().cloned().map(CatalogSource::File))
            .collect()
    }

    /// Loads and registers every source.
    ///
    /// # Errors
    ///
    /// Returns the first I/O, YAML, version or definition error.
    pub fn build(self) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();
        let sources = self.sources();
        for source in &sources {
            let origin = source.describe();
            debug!(source = %origin, "Loading catalog");
            source.load()?.register_into(&mut registry, &origin)?;
        }
        info!(
            sources = sources.len(),
            elements = registry.len(),
            "Built element registry"
        );
        Ok(registry)
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use lilyflower_core::{Arguments, Category, CategorySet, Element, LeafValue, MarkupText};

    use super::*;

    #[test]
    fn test_builtin_catalog_registers() {
        let registry = builtin_registry().unwrap();
        assert!(registry.len() > 150);
        for name in ["markup", "with_color", "book", "score", "parallel", "piano", "staccato"] {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_builtin_markup_example() {
        let registry = builtin_registry().unwrap();
        let colored = registry
            .node(
                "with_color",
                Arguments::new()
                    .arg(LeafValue::color("blue").unwrap())
                    .content(vec![MarkupText::new("dolce").into()]),
            )
            .unwrap();
        let markup = registry
            .node("markup", Arguments::new().content(vec![colored.into()]))
            .unwrap();
        assert_eq!(markup.format(0), "\\markup { \\with-color #blue { dolce } }");
    }

    #[test]
    fn test_builtin_categories() {
        let registry = builtin_registry().unwrap();
        let staccato = registry.lookup("staccato").unwrap();
        assert_eq!(
            staccato.categories,
            CategorySet::from_slice(&[Category::Attachment, Category::Accent])
        );
        assert!(staccato.inline);

        let parallel = registry.lookup("parallel").unwrap();
        assert_eq!(parallel.delimiter_open, "<<");
        assert_eq!(parallel.tag, "");
    }

    #[test]
    fn test_builtin_parallel_layout() {
        let registry = builtin_registry().unwrap();
        let voice = || -> Element { registry.node("sequential", Arguments::new()).unwrap().into() };
        let parallel = registry
            .node("parallel", Arguments::new().content(vec![voice(), voice()]))
            .unwrap();
        assert_eq!(parallel.format(0), "<<\n  { }\n  { }\n>>");
    }

    #[test]
    fn test_without_builtin_is_empty() {
        let registry = CatalogBuilder::new().without_builtin().build().unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sources_order() {
        let builder = CatalogBuilder::new().with_file("a.yml").with_file("b.yml");
        assert_eq!(
            builder.sources(),
            vec![
                CatalogSource::Builtin,
                CatalogSource::File("a.yml".into()),
                CatalogSource::File("b.yml".into()),
            ]
        );
    }
}
