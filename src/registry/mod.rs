//! Registry artifacts derived from the component tree.
//!
//! Everything here is recomputed from scratch on every build: the flat item
//! registry, the two-level category tree, and the tag frequency index. The
//! category-name table is the only other input and is read-only.

pub mod build;
pub mod model;
pub mod names;
pub mod order;

pub use build::{
    ComponentEntry, build_artifacts, build_registry, collect_entries, generation_timestamp,
    write_artifacts,
};
pub use model::{
    CATEGORIES_FILE, CategoryTree, DomainNode, REGISTRY_FILE, Registry, RegistryArtifacts,
    RegistryItem, SubjectNode, TAGS_FILE, TagCount, TagIndex,
};
pub use names::{CategoryLabel, CategoryNameTable};
pub use order::CategoryOrder;
