//! JSON Schema loading for the hand-maintained inputs.
//!
//! Schemas ship inside the crate (`schema/*.schema.json`) so the binaries do
//! not depend on the working directory. Each schema pins the document's
//! `schema` tag with a `const`; the loader checks that tag against the allowed
//! set before compiling so a stale schema cannot silently validate a newer
//! document format.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;

/// A compiled schema plus the document tag it pins.
pub(crate) struct LoadedSchema {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

/// Controls how schemas are checked before compilation.
pub(crate) struct SchemaLoadOptions<'a> {
    /// Where to find the pinned document tag inside the schema payload.
    pub schema_version_pointer: &'a str,
    /// Allowed tags; enforced when present.
    pub allowed_versions: Option<&'a BTreeSet<String>>,
}

impl Default for SchemaLoadOptions<'_> {
    fn default() -> Self {
        Self {
            schema_version_pointer: "/properties/schema/const",
            allowed_versions: None,
        }
    }
}

/// Compile a schema from its JSON text. `name` only labels errors.
pub(crate) fn compile_schema(
    name: &str,
    text: &str,
    options: SchemaLoadOptions<'_>,
) -> Result<LoadedSchema> {
    let schema_value: Value =
        serde_json::from_str(text).with_context(|| format!("parsing schema {name}"))?;

    let schema_version = extract_schema_version(&schema_value, options.schema_version_pointer)
        .ok_or_else(|| anyhow!("schema {name} missing document tag const"))?;

    if let Some(allowed) = options.allowed_versions {
        if !allowed.contains(&schema_version) {
            bail!(
                "schema {name} pins '{}', not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
    }

    let compiled = JSONSchema::compile(&schema_value)
        .map_err(|err| anyhow!("compiling schema {name}: {err}"))?;

    Ok(LoadedSchema {
        schema_version,
        compiled,
    })
}

impl LoadedSchema {
    /// Validate `instance`, joining every violation into one error.
    pub(crate) fn validate(&self, instance: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details = errors
                .map(|err| format!("{} (at '{}')", err, err.instance_path))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("failed schema validation:\n{details}");
        }
        Ok(())
    }
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '/'))
    {
        Some(version.to_string())
    } else {
        None
    }
}
