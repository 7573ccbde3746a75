//! Field-contract checks on the raw manifest value.

use crate::manifest::{ComponentId, IdLedger, MANIFEST_SCHEMA};
use crate::paths::portable_display;
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::LazyLock;

const ID_PATTERN: &str = r"^[a-z0-9](?:[a-z0-9.-]*[a-z0-9])?$";
const CATEGORY_PATTERN: &str = r"^[a-z][a-z0-9-]*/[a-z][a-z0-9-]*$";
// SemVer 2.0.0: no leading zeros in numeric identifiers.
const SEMVER_PATTERN: &str = r"^(?:0|[1-9][0-9]*)\.(?:0|[1-9][0-9]*)\.(?:0|[1-9][0-9]*)(?:-(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*)?(?:\+[0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*)?$";

static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(ID_PATTERN).expect("id pattern"));
static CATEGORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CATEGORY_PATTERN).expect("category pattern"));
static SEMVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SEMVER_PATTERN).expect("semver pattern"));

pub(crate) fn is_valid_id(value: &str) -> bool {
    ID_RE.is_match(value)
}

pub(crate) fn is_valid_category(value: &str) -> bool {
    CATEGORY_RE.is_match(value)
}

pub(crate) fn is_valid_semver(value: &str) -> bool {
    SEMVER_RE.is_match(value)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "nothing".to_string(),
    }
}

/// Check schema, id, name, category and version.
///
/// Every problem is reported; the id is claimed in `ledger` when it is a
/// string, even if it fails the pattern, so later files still see it as taken.
pub(crate) fn check_fields(manifest: &Value, path: &Path, ledger: &mut IdLedger) -> Vec<String> {
    let mut errors = Vec::new();

    let schema = manifest.get("schema");
    if schema.and_then(Value::as_str) != Some(MANIFEST_SCHEMA) {
        errors.push(format!(
            "manifest.schema must be \"{MANIFEST_SCHEMA}\" (got {})",
            describe(schema)
        ));
    }

    match manifest.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => {
            if !is_valid_id(id) {
                errors.push(format!("manifest.id must match {ID_PATTERN}"));
            }
            let id = ComponentId(id.to_string());
            if let Err(first) = ledger.claim(&id, path) {
                errors.push(format!(
                    "Duplicate manifest.id \"{id}\" (also in {})",
                    portable_display(first)
                ));
            }
        }
        _ => errors.push("manifest.id missing or not string".to_string()),
    }

    if non_empty_str(manifest.get("name")).is_none() {
        errors.push("manifest.name missing or not non-empty string".to_string());
    }

    match non_empty_str(manifest.get("category")) {
        None => errors.push("manifest.category missing or not non-empty string".to_string()),
        Some(category) if !is_valid_category(category) => errors.push(
            "manifest.category must be \"subject/domain\" using lower-case letters, digits, and \"-\""
                .to_string(),
        ),
        Some(_) => {}
    }

    match non_empty_str(manifest.get("version")) {
        None => errors.push("manifest.version missing or not non-empty string".to_string()),
        Some(version) if !is_valid_semver(version) => errors.push(format!(
            "manifest.version must be valid SemVer (got \"{version}\")"
        )),
        Some(_) => {}
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "schema": "cmp-manifest/v1",
            "id": "math.parabola",
            "name": "Parabola",
            "category": "math/algebra",
            "version": "1.0.0"
        })
    }

    #[test]
    fn valid_manifest_has_no_field_errors() {
        let mut ledger = IdLedger::new();
        assert!(check_fields(&valid(), Path::new("a.html"), &mut ledger).is_empty());
    }

    #[test]
    fn id_pattern_requires_alnum_edges() {
        for good in ["a", "a1", "math.parabola-2", "0x"] {
            assert!(is_valid_id(good), "{good}");
        }
        for bad in ["-a", "a-", "a.", "Abc", "a_b", "a b"] {
            assert!(!is_valid_id(bad), "{bad}");
        }
    }

    #[test]
    fn category_pattern_is_two_kebab_segments() {
        assert!(is_valid_category("math/algebra"));
        assert!(is_valid_category("physics/wave-optics2"));
        for bad in ["math", "Math/algebra", "math/algebra/x", "1math/x", "math/-x", "math//x"] {
            assert!(!is_valid_category(bad), "{bad}");
        }
    }

    #[test]
    fn semver_follows_full_grammar() {
        for good in ["0.0.0", "1.2.3", "1.0.0-alpha.1", "1.0.0-0.3.7", "1.0.0+build.5", "1.0.0-rc.1+sha.abc"] {
            assert!(is_valid_semver(good), "{good}");
        }
        for bad in ["1.0", "01.0.0", "1.0.0-", "1.0.0-01", "1.0.0+", "v1.0.0", "1.0.0-a..b"] {
            assert!(!is_valid_semver(bad), "{bad}");
        }
    }

    #[test]
    fn every_field_problem_is_reported() {
        let manifest = json!({"schema": "cmp-manifest/v0", "name": "  ", "category": "Math", "version": "1"});
        let mut ledger = IdLedger::new();
        let errors = check_fields(&manifest, Path::new("a.html"), &mut ledger);
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert_eq!(
            errors[0],
            "manifest.schema must be \"cmp-manifest/v1\" (got \"cmp-manifest/v0\")"
        );
        assert_eq!(errors[1], "manifest.id missing or not string");
    }

    #[test]
    fn duplicate_id_references_first_path() {
        let mut ledger = IdLedger::new();
        assert!(check_fields(&valid(), Path::new("components/a.html"), &mut ledger).is_empty());
        let errors = check_fields(&valid(), Path::new("components/b.html"), &mut ledger);
        assert_eq!(
            errors,
            vec!["Duplicate manifest.id \"math.parabola\" (also in components/a.html)"]
        );
    }
}
