//! Recursive discovery of component files.
//!
//! Ordering is part of the contract: duplicate-id detection keeps the first
//! occurrence in walk order, and the generated registry must be byte-stable
//! across runs, so results are always sorted by their full path string.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collect every regular file under `root` accepted by `keep`.
///
/// A missing root yields an empty list. Symlinks are not followed.
pub fn walk_files<F>(root: &Path, mut keep: F) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path) -> bool,
{
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if entry.file_type().is_file() && keep(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    Ok(files)
}

/// Case-insensitive `.html` suffix check.
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}

/// All component fragments under `components_dir`, in walk order.
pub fn collect_component_files(components_dir: &Path) -> Result<Vec<PathBuf>> {
    walk_files(components_dir, is_html_file)
}
