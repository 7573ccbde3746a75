//! Aggregation of manifests into the registry artifacts.
//!
//! Building is split into three steps so each can be exercised on its own:
//! [`collect_entries`] reads the tree (and is strict about duplicates),
//! [`build_artifacts`] is a pure projection with an injected timestamp, and
//! [`write_artifacts`] persists the result.

use crate::ProjectLayout;
use crate::manifest::{CategoryPath, ComponentId, IdLedger, Manifest, extract_manifest};
use crate::paths::to_posix_rel;
use crate::registry::model::{
    CATEGORIES_FILE, CATEGORIES_SCHEMA, CategoryTree, DomainNode, REGISTRY_FILE, REGISTRY_SCHEMA,
    Registry, RegistryArtifacts, RegistryItem, SubjectNode, TAGS_FILE, TAGS_SCHEMA, TagCount,
    TagIndex,
};
use crate::registry::names::CategoryNameTable;
use crate::registry::order::CategoryOrder;
use crate::walk::collect_component_files;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// A decoded manifest and where it came from.
#[derive(Clone, Debug)]
pub struct ComponentEntry {
    pub id: ComponentId,
    pub manifest: Manifest,
    /// Project-root-relative, `/`-separated.
    pub source_path: String,
}

/// Read every component under the layout, in walk order.
///
/// Unlike validation this is fail-fast: a file without a manifest, without an
/// id, or reusing an earlier id aborts the build rather than letting one
/// entry silently win.
pub fn collect_entries(layout: &ProjectLayout) -> Result<Vec<ComponentEntry>> {
    let files = collect_component_files(&layout.components_dir)?;
    let mut ledger = IdLedger::new();
    let mut entries = Vec::with_capacity(files.len());

    for file in files {
        let raw =
            fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
        let extracted = extract_manifest(&raw, Some(&file))?;
        let manifest = Manifest::from_value(&extracted.value)
            .with_context(|| format!("decoding manifest fields in {}", file.display()))?;
        let id = manifest
            .id
            .clone()
            .filter(|id| !id.as_str().is_empty())
            .ok_or_else(|| anyhow!("manifest.id missing: {}", file.display()))?;
        if let Err(first) = ledger.claim(&id, &file) {
            bail!(
                "Duplicate id \"{id}\":\n- {}\n- {}",
                first.display(),
                file.display()
            );
        }
        debug!(id = %id, path = %file.display(), "collected component");
        entries.push(ComponentEntry {
            id,
            manifest,
            source_path: to_posix_rel(&layout.root, &file),
        });
    }

    Ok(entries)
}

/// Shared `generatedAt` stamp for one build (RFC 3339, UTC, milliseconds).
pub fn generation_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn project_item(entry: &ComponentEntry, names: &CategoryNameTable) -> RegistryItem {
    let manifest = &entry.manifest;
    let category = manifest.category.as_str();
    RegistryItem {
        schema: manifest.schema.clone(),
        id: entry.id.clone(),
        name: manifest.name.clone(),
        name_en: manifest.english_name().map(str::to_string),
        category: category.to_string(),
        category_name: names.name_or(category, category).to_string(),
        category_name_en: names.name_en_or(category, category).to_string(),
        version: manifest.version.clone(),
        viewport: manifest.viewport.clone(),
        tags: manifest.tags.clone(),
        props: manifest.props.clone(),
        css_vars: manifest.css_vars.clone(),
        source_path: entry.source_path.clone(),
    }
}

fn category_tree(
    items: &[RegistryItem],
    names: &CategoryNameTable,
    generated_at: &str,
) -> CategoryTree {
    let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for item in items {
        // Malformed categories already failed validation; keep them out of the tree.
        let Some(path) = CategoryPath::parse(&item.category) else {
            continue;
        };
        *counts
            .entry(path.subject)
            .or_default()
            .entry(path.domain)
            .or_default() += 1;
    }

    let subjects = counts
        .into_iter()
        .map(|(subject, domains)| {
            let domains = domains
                .into_iter()
                .map(|(domain, count)| {
                    let full = format!("{subject}/{domain}");
                    DomainNode {
                        name: names.name_or(&full, &domain).to_string(),
                        name_en: names.name_en_or(&full, &domain).to_string(),
                        domain,
                        count,
                    }
                })
                .collect();
            SubjectNode { subject, domains }
        })
        .collect();

    CategoryTree {
        schema: CATEGORIES_SCHEMA.to_string(),
        generated_at: generated_at.to_string(),
        subjects,
    }
}

fn tag_index(items: &[RegistryItem], generated_at: &str) -> TagIndex {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for tag in items.iter().flat_map(|item| item.tags.iter()) {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        *counts.entry(tag).or_default() += 1;
    }

    TagIndex {
        schema: TAGS_SCHEMA.to_string(),
        generated_at: generated_at.to_string(),
        tags: counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect(),
    }
}

/// Project entries into the three artifacts.
///
/// Pure: the same entries, names and timestamp always yield the same output.
pub fn build_artifacts(
    entries: &[ComponentEntry],
    names: &CategoryNameTable,
    order: &CategoryOrder,
    generated_at: &str,
) -> RegistryArtifacts {
    let mut items: Vec<RegistryItem> = entries
        .iter()
        .map(|entry| project_item(entry, names))
        .collect();
    items.sort_by(|a, b| {
        order
            .compare(&a.category, &b.category)
            .then_with(|| a.id.cmp(&b.id))
    });

    let categories = category_tree(&items, names, generated_at);
    let tags = tag_index(&items, generated_at);
    let registry = Registry {
        schema: REGISTRY_SCHEMA.to_string(),
        generated_at: generated_at.to_string(),
        count: items.len(),
        items,
    };

    RegistryArtifacts {
        registry,
        categories,
        tags,
    }
}

fn write_json_atomic<T: Serialize>(dir: &Path, file_name: &str, value: &T) -> Result<()> {
    let target = dir.join(file_name);
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serializing {file_name}"))?;
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    temp.write_all(json.as_bytes())
        .with_context(|| format!("writing {}", target.display()))?;
    temp.persist(&target)
        .map_err(|err| err.error)
        .with_context(|| format!("replacing {}", target.display()))?;
    Ok(())
}

/// Write `registry.json`, `categories.json` and `tags.json` into `out_dir`,
/// creating it when absent.
pub fn write_artifacts(out_dir: &Path, artifacts: &RegistryArtifacts) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    write_json_atomic(out_dir, REGISTRY_FILE, &artifacts.registry)?;
    write_json_atomic(out_dir, CATEGORIES_FILE, &artifacts.categories)?;
    write_json_atomic(out_dir, TAGS_FILE, &artifacts.tags)?;
    Ok(())
}

/// Full build: load names, collect, project, write.
pub fn build_registry(layout: &ProjectLayout) -> Result<RegistryArtifacts> {
    let names = CategoryNameTable::load(&layout.category_names_path());
    let entries = collect_entries(layout)?;
    let artifacts = build_artifacts(
        &entries,
        &names,
        &CategoryOrder::new(),
        &generation_timestamp(),
    );
    write_artifacts(&layout.registry_dir, &artifacts)?;
    info!(
        components = artifacts.registry.count,
        tags = artifacts.tags.tags.len(),
        out = %layout.registry_dir.display(),
        "registry written"
    );
    Ok(artifacts)
}
