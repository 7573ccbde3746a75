//! Deserializable view of a `cmp-manifest/v1` block.
//!
//! The validator works on the raw JSON value so it can report every field
//! problem; this typed view is what the registry builder projects from. The
//! builder trusts validated files, so fields the validator does not check
//! (`nameEn`, `tags`, `props`, `cssVars`) decode leniently: a value of the
//! wrong type becomes the empty default and scalar tags are stringified.

use crate::manifest::identity::ComponentId;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// The only manifest schema tag accepted by the validator.
pub const MANIFEST_SCHEMA: &str = "cmp-manifest/v1";

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub schema: String,
    #[serde(default, deserialize_with = "id_or_none")]
    pub id: Option<ComponentId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_none")]
    pub name_en: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    /// Rendering hint passed through to the registry untouched.
    #[serde(default)]
    pub viewport: Option<Value>,
    #[serde(default, deserialize_with = "tag_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "array_or_empty")]
    pub props: Vec<Value>,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub css_vars: Map<String, Value>,
}

impl Manifest {
    /// Decode the typed view from an extracted manifest value.
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        Manifest::deserialize(value)
    }

    /// `nameEn` when present and non-empty.
    pub fn english_name(&self) -> Option<&str> {
        self.name_en.as_deref().filter(|name| !name.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn id_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ComponentId>, D::Error> {
    Ok(string_or_none(deserializer)?.map(ComponentId))
}

fn tag_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let Value::Array(values) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(text) => Some(text),
            Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        })
        .collect())
}

fn array_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => values,
        _ => Vec::new(),
    })
}

fn object_or_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Map<String, Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_manifest() {
        let value = json!({
            "schema": "cmp-manifest/v1",
            "id": "math.parabola",
            "name": "抛物线",
            "nameEn": "Parabola",
            "category": "math/algebra",
            "version": "1.2.0",
            "viewport": {"width": 640, "height": 360},
            "tags": ["graph", "quadratic"],
            "props": [{"name": "a", "type": "number"}],
            "cssVars": {"--cmp-accent": "#f00"}
        });
        let manifest = Manifest::from_value(&value).unwrap();
        assert_eq!(manifest.id, Some(ComponentId("math.parabola".into())));
        assert_eq!(manifest.english_name(), Some("Parabola"));
        assert_eq!(manifest.tags, vec!["graph", "quadratic"]);
        assert_eq!(manifest.props.len(), 1);
        assert_eq!(manifest.css_vars["--cmp-accent"], "#f00");
        assert_eq!(manifest.viewport, Some(json!({"width": 640, "height": 360})));
    }

    #[test]
    fn absent_and_null_collections_default_to_empty() {
        let value = json!({"id": "x", "tags": null, "cssVars": null, "nameEn": ""});
        let manifest = Manifest::from_value(&value).unwrap();
        assert!(manifest.tags.is_empty());
        assert!(manifest.props.is_empty());
        assert!(manifest.css_vars.is_empty());
        assert_eq!(manifest.english_name(), None);
        assert_eq!(manifest.category, "");
    }

    #[test]
    fn unchecked_fields_of_the_wrong_type_fall_back() {
        let value = json!({
            "id": "x",
            "nameEn": 5,
            "tags": ["graph", 3, true, null, {"k": 1}],
            "props": {},
            "cssVars": []
        });
        let manifest = Manifest::from_value(&value).unwrap();
        assert_eq!(manifest.name_en, None);
        assert_eq!(manifest.tags, vec!["graph", "3", "true"]);
        assert!(manifest.props.is_empty());
        assert!(manifest.css_vars.is_empty());

        let scalar_tags = Manifest::from_value(&json!({"id": 7, "tags": "graph"})).unwrap();
        assert!(scalar_tags.tags.is_empty());
        assert_eq!(scalar_tags.id, None);
    }
}
