use anyhow::{Context, Result, bail};
use cmpkit::ProjectLayout;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn validate_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cmp-validate"))
}

pub fn build_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cmp-build-registry"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Runs a command that is expected to fail and returns its output.
pub fn run_command_expect_failure(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        bail!(
            "command {:?} unexpectedly succeeded\nstdout: {}",
            cmd,
            String::from_utf8_lossy(&output.stdout)
        );
    }
    Ok(output)
}

/// Throwaway project root with a `components/` directory.
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        fs::create_dir(dir.path().join("components"))?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::at(self.root())
    }

    /// Writes `contents` to `components/<rel>`, creating parent directories.
    pub fn write_component(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        let path = self.root().join("components").join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    pub fn write_category_names(&self, contents: &str) -> Result<()> {
        let dir = self.root().join("registry");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("category-names.json"), contents)?;
        Ok(())
    }

    pub fn read_artifact(&self, name: &str) -> Result<String> {
        let path = self.root().join("registry").join(name);
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    }
}

/// A component that passes every structural check.
pub fn component(id: &str, category: &str, tags: &[&str]) -> String {
    component_with_manifest(
        id,
        json!({
            "schema": "cmp-manifest/v1",
            "id": id,
            "name": format!("{id} demo"),
            "category": category,
            "version": "1.0.0",
            "tags": tags,
        }),
    )
}

/// A well-formed fragment around an arbitrary manifest value.
pub fn component_with_manifest(root_id: &str, manifest: Value) -> String {
    format!(
        "<!-- @cmp-manifest\n{}\n-->\n<style>.cmp {{ display: block; }}</style>\n<div class=\"cmp\" data-cmp-id=\"{root_id}\" role=\"img\" aria-label=\"{root_id}\"></div>\n",
        serde_json::to_string_pretty(&manifest).unwrap_or_default()
    )
}
