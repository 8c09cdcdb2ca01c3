//! Read-only commands: manifest lookups and template class listing.

use crate::{
    asset::{AssetManifest, classes::collect_class_names},
    cli::build::build_manifest,
    config::StampConfig,
    log,
};
use anyhow::{Context, Result};
use std::path::Path;

/// `stamp lookup`: run the pipeline, then resolve `name` like a template would.
pub fn run_lookup(config: &StampConfig, name: &str, optimize: bool, width: Option<u32>) -> Result<()> {
    let output = build_manifest(config);
    println!("{}", resolve(&output.manifest, name, optimize, width));
    Ok(())
}

/// Dispatch to the matching template helper.
pub fn resolve(manifest: &AssetManifest, name: &str, optimize: bool, width: Option<u32>) -> String {
    match (optimize, width) {
        (_, Some(width)) => manifest.optimize_width(name, width),
        (true, None) => manifest.optimize(name),
        (false, None) => manifest.minify(name),
    }
}

/// `stamp classes`: print every class name used by templates under `dir`.
pub fn run_classes(dir: &Path) -> Result<()> {
    let classes = collect_class_names(dir)
        .with_context(|| format!("Failed to scan templates in {}", dir.display()))?;
    if classes.is_empty() {
        log!("warning"; "no class attributes found under {}", dir.display());
        return Ok(());
    }
    crate::debug!("classes"; "{} class names under {}", classes.len(), dir.display());
    for class in classes.as_slice() {
        println!("{class}");
    }
    Ok(())
}
