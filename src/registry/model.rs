//! Serialized shape of the generated registry artifacts.
//!
//! Field names follow the JSON consumed by the preview site (`camelCase`);
//! the structs round-trip so tests and collaborators can read the files back.

use crate::manifest::ComponentId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const REGISTRY_SCHEMA: &str = "cmp-registry/v1";
pub const CATEGORIES_SCHEMA: &str = "cmp-categories/v1";
pub const TAGS_SCHEMA: &str = "cmp-tags/v1";

pub const REGISTRY_FILE: &str = "registry.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const TAGS_FILE: &str = "tags.json";

/// One component as listed in `registry.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryItem {
    pub schema: String,
    pub id: ComponentId,
    pub name: String,
    pub name_en: Option<String>,
    pub category: String,
    pub category_name: String,
    pub category_name_en: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Value>,
    pub tags: Vec<String>,
    pub props: Vec<Value>,
    pub css_vars: Map<String, Value>,
    /// Project-root-relative, always `/`-separated.
    pub source_path: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    pub schema: String,
    pub generated_at: String,
    pub count: usize,
    pub items: Vec<RegistryItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTree {
    pub schema: String,
    pub generated_at: String,
    pub subjects: Vec<SubjectNode>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectNode {
    pub subject: String,
    pub domains: Vec<DomainNode>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainNode {
    pub domain: String,
    pub count: usize,
    pub name: String,
    pub name_en: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagIndex {
    pub schema: String,
    pub generated_at: String,
    pub tags: Vec<TagCount>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// The three artifacts of one build, sharing one `generatedAt`.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryArtifacts {
    pub registry: Registry,
    pub categories: CategoryTree,
    pub tags: TagIndex,
}
