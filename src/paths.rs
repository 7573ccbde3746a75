//! Portable relative paths for generated artifacts.
//!
//! `sourcePath` values in the registry are consumed by a browser-side preview,
//! so they are always project-root-relative and `/`-separated no matter which
//! host produced them.

use std::path::{Component, Path};

/// Relative path from `base` to `target`, joined with `/`.
///
/// Both paths are compared component-wise without touching the filesystem;
/// callers pass paths derived from the same root (the walker joins onto the
/// components directory, which lives under the project root).
pub fn to_posix_rel(base: &Path, target: &Path) -> String {
    let target_components: Vec<_> = target.components().collect();
    let base_components: Vec<_> = base.components().collect();

    let mut shared_prefix_len = 0usize;
    while shared_prefix_len < target_components.len()
        && shared_prefix_len < base_components.len()
        && target_components[shared_prefix_len] == base_components[shared_prefix_len]
    {
        shared_prefix_len += 1;
    }

    let mut segments: Vec<String> = Vec::new();

    for component in base_components.iter().skip(shared_prefix_len) {
        match component {
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            _ => segments.push("..".to_string()),
        }
    }

    for component in target_components.iter().skip(shared_prefix_len) {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Prefix(prefix) => {
                segments.push(prefix.as_os_str().to_string_lossy().into_owned())
            }
            Component::ParentDir => segments.push("..".to_string()),
            Component::Normal(seg) => segments.push(normalize_segment(&seg.to_string_lossy())),
        }
    }

    if segments.is_empty() {
        return ".".to_string();
    }
    segments.join("/")
}

/// Display form of a path with `/` separators, for error reports.
pub fn portable_display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

// A segment can still carry a backslash when a Windows-style relative path
// was handed to us on a Unix host.
fn normalize_segment(segment: &str) -> String {
    segment.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn nested_component_is_slash_separated() {
        let base = Path::new("/tmp/project");
        let target: PathBuf = ["/tmp/project", "components", "math", "algebra", "x.html"]
            .iter()
            .collect();
        assert_eq!(
            to_posix_rel(base, &target),
            "components/math/algebra/x.html"
        );
    }

    #[test]
    fn sibling_tree_walks_up() {
        let base = Path::new("/tmp/project/registry");
        let target = Path::new("/tmp/project/components/a.html");
        assert_eq!(to_posix_rel(base, target), "../components/a.html");
    }

    #[test]
    fn portable_display_uses_forward_slashes() {
        assert_eq!(
            portable_display(Path::new("components\\math\\x.html")),
            "components/math/x.html"
        );
    }

    #[test]
    fn identical_paths_are_dot() {
        let base = Path::new("/tmp/project");
        assert_eq!(to_posix_rel(base, base), ".");
    }

    #[test]
    fn stray_backslashes_are_normalized() {
        let base = Path::new("/tmp/project");
        let target = Path::new("/tmp/project/components\\math\\x.html");
        assert_eq!(to_posix_rel(base, target), "components/math/x.html");
    }
}
