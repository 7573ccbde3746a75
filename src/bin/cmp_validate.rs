//! Lints every component under `components/` against the fragment contract.
//!
//! Exit status is the contract collaborators rely on: zero only when no file
//! produced an error; otherwise every `path: message` pair is printed to
//! stderr and the process exits 1.

use anyhow::Result;
use clap::Parser;
use cmpkit::{discover_layout, validate_tree};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "cmp-validate")]
#[command(about = "Validate component manifests and fragment structure")]
struct Cli {
    /// Project root (defaults to CMP_ROOT, then the nearest ancestor with components/)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Components directory to scan instead of <root>/components
    #[arg(long)]
    components: Option<PathBuf>,
}

fn main() {
    cmpkit::logging::init("cmp-validate");
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    let layout = discover_layout(cli.root.as_deref(), cli.components.as_deref(), None)?;

    let report = validate_tree(&layout)?;
    if !report.is_ok() {
        eprintln!("Validation failed with {} error(s):", report.errors.len());
        for err in &report.errors {
            eprintln!("- {err}");
        }
        return Ok(false);
    }

    info!(files = report.files_checked, "validation passed");
    println!("ok: {} component(s) validated", report.files_checked);
    Ok(true)
}
