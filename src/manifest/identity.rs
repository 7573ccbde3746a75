use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Stable identifier for a component (`manifest.id`, mirrored in the root
/// element's `data-cmp-id`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `subject/domain` category split into its two segments.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CategoryPath {
    pub subject: String,
    pub domain: String,
}

impl CategoryPath {
    /// Split a category string; `None` unless it has exactly two non-empty
    /// segments.
    pub fn parse(value: &str) -> Option<Self> {
        let (subject, domain) = value.split_once('/')?;
        if subject.is_empty() || domain.is_empty() || domain.contains('/') {
            return None;
        }
        Some(Self {
            subject: subject.to_string(),
            domain: domain.to_string(),
        })
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.subject, self.domain)
    }
}

/// First-occurrence ledger of component ids.
///
/// Files are fed in walk order; the first path to claim an id owns it and
/// every later claim is reported against that path.
#[derive(Debug, Default)]
pub struct IdLedger {
    first_seen: BTreeMap<ComponentId, PathBuf>,
}

impl IdLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` for `path`, or return the path that already owns it.
    pub fn claim(&mut self, id: &ComponentId, path: &Path) -> Result<(), &Path> {
        if self.first_seen.contains_key(id) {
            return Err(self.first_seen[id].as_path());
        }
        self.first_seen.insert(id.clone(), path.to_path_buf());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }
}
