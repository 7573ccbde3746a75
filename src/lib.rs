//! Shared library for the component-library tooling.
//!
//! The crate owns the component contract: it walks `components/`, extracts
//! the `@cmp-manifest` block embedded at the top of every fragment, lints each
//! file against the structural rules, and aggregates the manifests into the
//! registry artifacts under `registry/`. Public functions here form the
//! contract that the `cmp-validate` and `cmp-build-registry` binaries (and the
//! preview/watch collaborators that shell out to them) depend on.

use anyhow::{Context, Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod logging;
pub mod manifest;
pub mod paths;
pub mod rebuild;
pub mod registry;
mod schema_loader;
pub mod validate;
pub mod walk;

pub use manifest::{
    ComponentId, ExtractedManifest, IdLedger, MANIFEST_SCHEMA, Manifest, ManifestError,
    extract_manifest,
};
pub use paths::{portable_display, to_posix_rel};
pub use rebuild::{RebuildQueue, run_coalesced};
pub use registry::{
    CategoryNameTable, CategoryOrder, CategoryTree, ComponentEntry, Registry, RegistryArtifacts,
    RegistryItem, TagIndex, build_artifacts, build_registry, collect_entries, write_artifacts,
};
pub use validate::{ValidationError, ValidationReport, Validator, validate_component, validate_tree};
pub use walk::{collect_component_files, is_html_file, walk_files};

/// Environment variable naming the project root.
pub const ROOT_ENV: &str = "CMP_ROOT";

const COMPONENTS_DIR: &str = "components";
const REGISTRY_DIR: &str = "registry";
const CATEGORY_NAMES_FILE: &str = "category-names.json";

/// Fixed locations under a project root.
///
/// The layout mirrors the repository convention: authored fragments live in
/// `components/`, generated artifacts and the hand-maintained category-name
/// table live in `registry/`. Either directory can be overridden from the
/// command line without moving the root used for `sourcePath` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub components_dir: PathBuf,
    pub registry_dir: PathBuf,
}

impl ProjectLayout {
    /// Layout with the default directories under `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            components_dir: root.join(COMPONENTS_DIR),
            registry_dir: root.join(REGISTRY_DIR),
            root,
        }
    }

    pub fn with_components_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.components_dir = dir.into();
        self
    }

    pub fn with_registry_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.registry_dir = dir.into();
        self
    }

    /// Location of the read-only category-name lookup table.
    pub fn category_names_path(&self) -> PathBuf {
        self.registry_dir.join(CATEGORY_NAMES_FILE)
    }
}

/// Returns true when `candidate` looks like a project root.
fn is_project_root(candidate: &Path) -> bool {
    candidate.join(COMPONENTS_DIR).is_dir()
}

/// Verifies that a `CMP_ROOT` hint points at a valid project.
fn project_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.trim().is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !is_project_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_project_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the project root.
///
/// Search order: an explicit root (must be an existing directory), then
/// `CMP_ROOT` when it points at a directory containing `components/`, then
/// the nearest ancestor of the current directory that does.
pub fn find_project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let hint = env::var(ROOT_ENV).ok();
    let cwd = env::current_dir().context("reading current directory")?;
    resolve_project_root(explicit, hint.as_deref(), &cwd)
}

/// [`find_project_root`] with the environment and working directory passed in.
pub fn resolve_project_root(
    explicit: Option<&Path>,
    env_hint: Option<&str>,
    cwd: &Path,
) -> Result<PathBuf> {
    if let Some(root) = explicit {
        if !root.is_dir() {
            bail!("project root {} is not a directory", root.display());
        }
        return fs::canonicalize(root)
            .with_context(|| format!("canonicalizing {}", root.display()));
    }

    if let Some(root) = env_hint.and_then(project_root_from_hint) {
        return Ok(root);
    }

    if let Some(root) = search_upwards(cwd) {
        return Ok(root);
    }

    bail!(
        "Unable to locate a component project (no components/ directory above {}). Pass --root or set {ROOT_ENV}.",
        cwd.display()
    )
}

/// Layout for a command-line run: the discovered root plus optional
/// directory overrides.
///
/// Relative overrides are anchored at the current directory and
/// canonicalized when they exist, so they share a prefix with the canonical
/// root and `sourcePath` values stay root-relative.
pub fn discover_layout(
    root: Option<&Path>,
    components: Option<&Path>,
    registry: Option<&Path>,
) -> Result<ProjectLayout> {
    let mut layout = ProjectLayout::at(find_project_root(root)?);
    let cwd = env::current_dir().context("reading current directory")?;
    if let Some(dir) = components {
        layout = layout.with_components_dir(anchor_dir(&cwd, dir));
    }
    if let Some(dir) = registry {
        layout = layout.with_registry_dir(anchor_dir(&cwd, dir));
    }
    Ok(layout)
}

fn anchor_dir(cwd: &Path, dir: &Path) -> PathBuf {
    let joined = cwd.join(dir);
    fs::canonicalize(&joined).unwrap_or(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins_over_hint() {
        let explicit = TempDir::new().unwrap();
        let hinted = TempDir::new().unwrap();
        fs::create_dir(hinted.path().join("components")).unwrap();

        let root = resolve_project_root(
            Some(explicit.path()),
            hinted.path().to_str(),
            hinted.path(),
        )
        .unwrap();
        assert_eq!(root, fs::canonicalize(explicit.path()).unwrap());
    }

    #[test]
    fn invalid_hint_falls_back_to_upward_search() {
        let project = TempDir::new().unwrap();
        fs::create_dir(project.path().join("components")).unwrap();
        let nested = project.path().join("components").join("math");
        fs::create_dir_all(&nested).unwrap();

        let root = resolve_project_root(None, Some("/definitely/not/here"), &nested).unwrap();
        assert_eq!(root, fs::canonicalize(project.path()).unwrap());
    }

    #[test]
    fn missing_root_is_an_error() {
        let empty = TempDir::new().unwrap();
        let err = resolve_project_root(None, None, empty.path()).unwrap_err();
        assert!(err.to_string().contains(ROOT_ENV));
    }

    #[test]
    fn relative_overrides_resolve_against_cwd() {
        let project = TempDir::new().unwrap();
        let root = fs::canonicalize(project.path()).unwrap();
        fs::create_dir(root.join("components")).unwrap();

        assert_eq!(
            anchor_dir(&root, Path::new("components")),
            root.join("components")
        );
        assert_eq!(
            anchor_dir(&root.join("components"), Path::new("../components")),
            root.join("components")
        );
        assert_eq!(
            anchor_dir(&root, Path::new("out/registry")),
            root.join("out/registry")
        );
        assert_eq!(
            anchor_dir(&root, Path::new("/abs/registry")),
            PathBuf::from("/abs/registry")
        );
    }

    #[test]
    fn layout_overrides_keep_root() {
        let layout = ProjectLayout::at("/proj")
            .with_components_dir("/elsewhere/components")
            .with_registry_dir("/out");
        assert_eq!(layout.root, PathBuf::from("/proj"));
        assert_eq!(
            layout.category_names_path(),
            PathBuf::from("/out/category-names.json")
        );
    }
}
