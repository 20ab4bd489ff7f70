use std::fs;
use std::path::{Path, PathBuf};

use lilyflower_catalog::{
    CatalogBuilder, CatalogError, CatalogFile, builtin_catalog, builtin_registry,
};
use lilyflower_core::{Arguments, LeafValue, MarkupText, SchemaError};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CUSTOM_CATALOG: &str = r#"
version: "1.0"
elements:
  - name: coda
    tag: '\coda'
    categories: [markup, attachment]
  - name: boxed_title
    tag: '\boxed-title'
    categories: [markup, attachment]
    parameters:
      - { name: size, kind: signed-float, optional: true }
    content: [markup, comment]
"#;

fn write_catalog(dir: &Path, name: &str, yaml: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, yaml).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

#[test]
fn test_builtin_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("builtin.yml");

    let catalog = builtin_catalog().unwrap();
    catalog.save(&path).unwrap();
    let reloaded = CatalogFile::load(&path).unwrap();
    assert_eq!(reloaded, catalog);

    let registry = CatalogBuilder::new().without_builtin().with_file(&path).build().unwrap();
    assert_eq!(registry.len(), builtin_registry().unwrap().len());
}

#[test]
fn test_export_from_registry_matches_builtin() {
    let registry = builtin_registry().unwrap();
    let exported = CatalogFile::from_registry(&registry);
    assert_eq!(exported.elements.len(), registry.len());
    assert_eq!(exported.elements[0].name, "markup");

    let mut rebuilt = lilyflower_core::SchemaRegistry::new();
    exported.register_into(&mut rebuilt, "export").unwrap();
    assert!(rebuilt.names().eq(registry.names()));
}

#[test]
fn test_builtin_score_document() {
    let registry = builtin_registry().unwrap();
    let dynamic = registry.node("forte", Arguments::new()).unwrap();
    let title = registry
        .node("bold", Arguments::new().content(vec![MarkupText::new("Allegro").into()]))
        .unwrap();
    let markup = registry
        .node("markup", Arguments::new().content(vec![title.into()]))
        .unwrap();
    let voice = registry
        .node("sequential", Arguments::new().content(vec![markup.into(), dynamic.into()]))
        .unwrap();
    assert_eq!(voice.format(0), "{\n  \\markup { \\bold { Allegro } }\n  \\f\n}");
}

// ---------------------------------------------------------------------------
// Project catalogs
// ---------------------------------------------------------------------------

#[test]
fn test_builder_with_extra_file() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "custom.yml", CUSTOM_CATALOG);

    let registry = CatalogBuilder::new().with_file(&path).build().unwrap();
    assert!(registry.contains("coda"));
    assert!(registry.contains("bold"));

    let title = registry
        .node(
            "boxed_title",
            Arguments::new()
                .arg(LeafValue::signed_float(2.5).unwrap())
                .content(vec![MarkupText::new("Coda").into()]),
        )
        .unwrap();
    assert_eq!(title.format(0), "\\boxed-title #2.5 { Coda }");
}

#[test]
fn test_builder_files_only() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "custom.yml", CUSTOM_CATALOG);

    let registry = CatalogBuilder::new().without_builtin().with_file(&path).build().unwrap();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["coda", "boxed_title"]);
}

#[test]
fn test_duplicate_definition_is_rejected() {
    let dir = TempDir::new().unwrap();
    let yaml = r#"
version: "1.0"
elements:
  - { name: bold, tag: '\bold', categories: [markup] }
"#;
    let path = write_catalog(dir.path(), "dupe.yml", yaml);

    let err = CatalogBuilder::new().with_file(&path).build().unwrap_err();
    match &err {
        CatalogError::InvalidDefinition { origin, error } => {
            assert!(origin.ends_with("dupe.yml"));
            assert_eq!(error, &SchemaError::DuplicateElement("bold".into()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("element already registered: bold"));
}

// ---------------------------------------------------------------------------
// Malformed catalogs
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_category_message() {
    let dir = TempDir::new().unwrap();
    let yaml = r#"
version: "1.0"
elements:
  - { name: tutti, tag: '\tutti', categories: [orchestra] }
"#;
    let path = write_catalog(dir.path(), "bad.yml", yaml);

    let err = CatalogBuilder::new().without_builtin().with_file(&path).build().unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("invalid element in "), "{message}");
    assert!(message.ends_with("unknown category: \"orchestra\""), "{message}");
}

#[test]
fn test_bad_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "broken.yml", "version: [unclosed\n");

    let err = CatalogFile::load(&path).unwrap_err();
    assert!(matches!(err, CatalogError::YamlError(_)));
}

#[test]
fn test_unsupported_version() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "future.yml", "version: \"2.0\"\nelements: []\n");

    let err = CatalogFile::load(&path).unwrap_err();
    assert!(matches!(err, CatalogError::UnsupportedVersion(ref v) if v == "2.0"));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = CatalogBuilder::new()
        .with_file(dir.path().join("absent.yml"))
        .build()
        .unwrap_err();
    assert!(matches!(err, CatalogError::IoError(_)));
}
