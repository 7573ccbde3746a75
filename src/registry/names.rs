//! Localized category labels from `registry/category-names.json`.
//!
//! The table is enrichment data, not contract data: a missing file is an empty
//! table, and an unreadable or malformed one degrades to an empty table with
//! a warning instead of failing the build.

use crate::schema_loader::{LoadedSchema, SchemaLoadOptions, compile_schema};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const CATEGORY_NAMES_SCHEMA: &str = include_str!("../../schema/category_names.schema.json");
const CATEGORY_NAMES_TAG: &str = "cmp-category-names/v1";

/// Display labels for one `subject/domain` category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "nameEn")]
    pub name_en: Option<String>,
}

#[derive(Deserialize)]
struct CategoryNamesDocument {
    #[serde(default)]
    categories: BTreeMap<String, CategoryLabel>,
}

/// Read-only lookup from category string to labels.
#[derive(Clone, Debug, Default)]
pub struct CategoryNameTable {
    entries: BTreeMap<String, CategoryLabel>,
}

impl CategoryNameTable {
    pub fn new(entries: BTreeMap<String, CategoryLabel>) -> Self {
        Self { entries }
    }

    /// Load the table, never failing.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(table) => table,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %format!("{err:#}"),
                    "failed to load category names; using raw category text"
                );
                Self::default()
            }
        }
    }

    /// Load the table, surfacing read, parse and schema errors.
    ///
    /// A missing file is not an error.
    pub fn try_load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no category-name table");
            return Ok(Self::default());
        }
        let data =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let value: Value =
            serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        table_schema()?
            .validate(&value)
            .with_context(|| format!("checking {}", path.display()))?;
        let document: CategoryNamesDocument = serde_json::from_value(value)
            .with_context(|| format!("decoding {}", path.display()))?;
        Ok(Self::new(document.categories))
    }

    /// Localized name, falling back to `fallback` when absent or empty.
    pub fn name_or<'a>(&'a self, category: &str, fallback: &'a str) -> &'a str {
        self.entries
            .get(category)
            .and_then(|label| label.name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(fallback)
    }

    /// English name, falling back to `fallback` when absent or empty.
    pub fn name_en_or<'a>(&'a self, category: &str, fallback: &'a str) -> &'a str {
        self.entries
            .get(category)
            .and_then(|label| label.name_en.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn table_schema() -> Result<LoadedSchema> {
    let allowed = BTreeSet::from_iter([CATEGORY_NAMES_TAG.to_string()]);
    let schema = compile_schema(
        "category_names.schema.json",
        CATEGORY_NAMES_SCHEMA,
        SchemaLoadOptions {
            allowed_versions: Some(&allowed),
            ..Default::default()
        },
    )?;
    debug!(schema = %schema.schema_version, "compiled category-name schema");
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_an_empty_table() {
        let temp = TempDir::new().unwrap();
        let table = CategoryNameTable::try_load(&temp.path().join("category-names.json")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn loads_labels_and_falls_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("category-names.json");
        fs::write(
            &path,
            r#"{"categories": {"math/algebra": {"name": "代数", "nameEn": "Algebra"}, "math/geometry": {"name": ""}}}"#,
        )
        .unwrap();

        let table = CategoryNameTable::try_load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.name_or("math/algebra", "math/algebra"), "代数");
        assert_eq!(table.name_en_or("math/algebra", "math/algebra"), "Algebra");
        assert_eq!(table.name_or("math/geometry", "geometry"), "geometry");
        assert_eq!(table.name_en_or("physics/optics", "optics"), "optics");
    }

    #[test]
    fn malformed_json_degrades_to_empty_table() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("category-names.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(CategoryNameTable::try_load(&path).is_err());
        assert!(CategoryNameTable::load(&path).is_empty());
    }

    #[test]
    fn schema_violations_degrade_to_empty_table() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("category-names.json");
        fs::write(&path, r#"{"categories": {"math/algebra": {"name": 7}}}"#).unwrap();
        let err = CategoryNameTable::try_load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed schema validation"));
        assert!(CategoryNameTable::load(&path).is_empty());
    }

    #[test]
    fn embedded_schema_compiles() {
        let schema = table_schema().unwrap();
        assert_eq!(schema.schema_version, CATEGORY_NAMES_TAG);
    }

    #[test]
    fn stray_keys_keep_the_other_labels() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("category-names.json");
        fs::write(
            &path,
            r#"{"schema": "cmp-category-names/v1", "categories": {"misc": {"name": "杂项"}, "math/algebra": {"name": "代数"}}}"#,
        )
        .unwrap();

        let table = CategoryNameTable::load(&path);
        assert_eq!(table.len(), 2);
        assert_eq!(table.name_or("math/algebra", "math/algebra"), "代数");
    }

    #[test]
    fn document_without_categories_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("category-names.json");
        fs::write(&path, r#"{"schema": "cmp-category-names/v1"}"#).unwrap();
        assert!(CategoryNameTable::try_load(&path).unwrap().is_empty());
    }
}
