//! Locating and decoding the manifest block.
//!
//! The block must be the first non-whitespace content of the file (an
//! optional BOM is tolerated) and looks like:
//!
//! ```text
//! <!-- @cmp-manifest
//! { "schema": "cmp-manifest/v1", "id": "...", ... }
//! -->
//! ```

use serde_json::Value;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MANIFEST_OPEN: &str = "<!-- @cmp-manifest";
pub const MANIFEST_CLOSE: &str = "-->";

const BOM: char = '\u{feff}';

/// Why a file has no usable manifest.
///
/// Any of these is fatal for the file: nothing else can be checked safely
/// without the manifest fields.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Missing or not-top @cmp-manifest{}", path_suffix(.path))]
    MissingOrNotTop { path: Option<PathBuf> },
    #[error("Unclosed @cmp-manifest{}", path_suffix(.path))]
    Unclosed { path: Option<PathBuf> },
    #[error("Invalid manifest JSON{}: {source}", path_suffix(.path))]
    InvalidJson {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(": {}", path.display()),
        None => String::new(),
    }
}

/// Decoded manifest plus where it sat in the BOM-stripped text.
#[derive(Debug, Clone)]
pub struct ExtractedManifest {
    pub value: Value,
    /// From the start of the opening token to just past the closing token.
    pub range: Range<usize>,
}

/// Drop a single leading byte-order mark.
pub fn strip_bom(raw: &str) -> &str {
    raw.strip_prefix(BOM).unwrap_or(raw)
}

/// Extract the manifest block from raw file text.
///
/// `path` is only used to decorate error messages.
pub fn extract_manifest(
    raw: &str,
    path: Option<&Path>,
) -> Result<ExtractedManifest, ManifestError> {
    let text = strip_bom(raw);
    let owned_path = || path.map(Path::to_path_buf);

    // Further BOMs count as leading whitespace.
    let Some(first_non_ws) = text.find(|c: char| !c.is_whitespace() && c != BOM) else {
        return Err(ManifestError::MissingOrNotTop { path: owned_path() });
    };
    let start = match text.find(MANIFEST_OPEN) {
        Some(start) if start == first_non_ws => start,
        _ => return Err(ManifestError::MissingOrNotTop { path: owned_path() }),
    };

    let body_start = start + MANIFEST_OPEN.len();
    let Some(close_offset) = text[body_start..].find(MANIFEST_CLOSE) else {
        return Err(ManifestError::Unclosed { path: owned_path() });
    };
    let body_end = body_start + close_offset;

    let value = serde_json::from_str(text[body_start..body_end].trim()).map_err(|source| {
        ManifestError::InvalidJson {
            path: owned_path(),
            source,
        }
    })?;

    Ok(ExtractedManifest {
        value,
        range: start..body_end + MANIFEST_CLOSE.len(),
    })
}
