//! Structural validation of component fragments.
//!
//! Validation is a linter pass: every file is checked independently and every
//! problem is collected, so one run surfaces the complete error set. The only
//! state shared between files is the id ledger used for duplicate detection,
//! threaded through the pass in walk order.

mod content;
mod dom;
mod fields;

use crate::ProjectLayout;
use crate::manifest::{IdLedger, extract_manifest, strip_bom};
use crate::paths::portable_display;
use crate::walk::collect_component_files;
use anyhow::Result;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One problem found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub path: PathBuf,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: &Path, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", portable_display(&self.path), self.message)
    }
}

/// Check one component file.
///
/// A file without a usable manifest yields exactly that one error. Otherwise
/// field, content-policy, DOM and CSS checks all run and accumulate.
pub fn validate_component(path: &Path, raw: &str, ledger: &mut IdLedger) -> Vec<ValidationError> {
    let manifest = match extract_manifest(raw, Some(path)) {
        Ok(extracted) => extracted.value,
        Err(err) => return vec![ValidationError::new(path, err.to_string())],
    };

    let mut messages = fields::check_fields(&manifest, path, ledger);
    messages.extend(content::check_forbidden_content(raw));

    let manifest_id = manifest.get("id").and_then(Value::as_str);
    let outcome = dom::check_dom(strip_bom(raw).trim(), manifest_id);
    messages.extend(outcome.errors);
    messages.extend(content::check_css_isolation(&outcome.style_text));

    messages
        .into_iter()
        .map(|message| ValidationError::new(path, message))
        .collect()
}

/// Accumulates errors across a whole tree.
#[derive(Debug, Default)]
pub struct Validator {
    ledger: IdLedger,
    errors: Vec<ValidationError>,
    files_checked: usize,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check one file; call in walk order.
    pub fn check_file(&mut self, path: &Path, raw: &str) {
        let errors = validate_component(path, raw, &mut self.ledger);
        debug!(path = %portable_display(path), errors = errors.len(), "checked component");
        self.errors.extend(errors);
        self.files_checked += 1;
    }

    /// Record a file that could not be read at all.
    pub fn record_unreadable(&mut self, path: &Path, err: &std::io::Error) {
        self.errors
            .push(ValidationError::new(path, format!("unable to read: {err}")));
        self.files_checked += 1;
    }

    pub fn finish(self) -> ValidationReport {
        ValidationReport {
            files_checked: self.files_checked,
            errors: self.errors,
        }
    }
}

/// Outcome of a validation pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub files_checked: usize,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// True only when no file produced any error.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate every component under the layout's components directory.
///
/// Error paths are reported relative to the project root. Only a failure to
/// walk the tree is returned as `Err`; per-file problems (including unreadable
/// files) land in the report.
pub fn validate_tree(layout: &ProjectLayout) -> Result<ValidationReport> {
    let files = collect_component_files(&layout.components_dir)?;
    let mut validator = Validator::new();
    for file in files {
        let display = file
            .strip_prefix(&layout.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| file.clone());
        match fs::read_to_string(&file) {
            Ok(raw) => validator.check_file(&display, &raw),
            Err(err) => validator.record_unreadable(&display, &err),
        }
    }
    Ok(validator.finish())
}
