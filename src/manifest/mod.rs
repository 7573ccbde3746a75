//! The `@cmp-manifest` block embedded at the top of every component.
//!
//! Extraction is a pure function over file text; the typed [`Manifest`] view
//! is only used once a file is known to carry a manifest. Identity types and
//! the first-occurrence id ledger shared by the validator and the registry
//! builder live here too.

pub mod extract;
pub mod identity;
pub mod model;

pub use extract::{
    ExtractedManifest, MANIFEST_CLOSE, MANIFEST_OPEN, ManifestError, extract_manifest, strip_bom,
};
pub use identity::{CategoryPath, ComponentId, IdLedger};
pub use model::{MANIFEST_SCHEMA, Manifest};
