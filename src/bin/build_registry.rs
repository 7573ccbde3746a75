//! Regenerates `registry.json`, `categories.json` and `tags.json`.
//!
//! Intended to run after `cmp-validate` passes; it does not re-lint, but it
//! refuses to build when two components claim the same id.

use anyhow::Result;
use clap::Parser;
use cmpkit::{build_registry, discover_layout};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cmp-build-registry")]
#[command(about = "Build the component registry artifacts")]
struct Cli {
    /// Project root (defaults to CMP_ROOT, then the nearest ancestor with components/)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Components directory to scan instead of <root>/components
    #[arg(long)]
    components: Option<PathBuf>,

    /// Output directory instead of <root>/registry (category-names.json is read from here too)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    cmpkit::logging::init("cmp-build-registry");
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let layout = discover_layout(
        cli.root.as_deref(),
        cli.components.as_deref(),
        cli.out.as_deref(),
    )?;

    let artifacts = build_registry(&layout)?;
    println!("ok: {} components", artifacts.registry.count);
    Ok(())
}
