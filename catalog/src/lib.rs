//! Element catalogs for `lilyflower-core`.
//!
//! The rules a [`SchemaRegistry`](lilyflower_core::SchemaRegistry) enforces
//! are plain data. This crate keeps them in YAML: a built-in table of the
//! common LilyPond markup commands, score blocks, dynamics and
//! articulations, plus any number of project catalogs in the same format.
//!
//! # Quick start
//!
//! ```
//! use lilyflower_catalog::builtin_registry;
//! use lilyflower_core::{Arguments, MarkupText};
//!
//! let registry = builtin_registry().unwrap();
//! let bold = registry
//!     .node("bold", Arguments::new().content(vec![MarkupText::new("Fine").into()]))
//!     .unwrap();
//! assert_eq!(bold.format(0), "\\bold { Fine }");
//! ```

mod definition;
mod error;
mod loader;

pub use definition::{
    CATALOG_VERSION, CatalogFile, ElementDefinition, KindDefinition, ParameterDefinition,
};
pub use error::{CatalogError, Result};
pub use loader::{CatalogBuilder, CatalogSource, builtin_catalog, builtin_registry};
