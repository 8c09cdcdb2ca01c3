//! Startup pipeline orchestration.
//!
//! Phases, in order:
//! - **Minify** - fingerprint stylesheets and scripts per `[[assets.minify]]`
//! - **Bundle** - combine `[[assets.bundle]]` inputs, then fingerprint
//! - **Images** - re-encode per `[[images.convert]]`, plus width variants
//! - **Favicon** - favicon set when `[favicon] enable`
//!
//! Every phase logs and continues; a run always yields a manifest, possibly
//! partial.

use crate::{
    asset::{
        AssetManifest, AssetMap, Minify, ScanReport, combine, publish_atomic,
        scan_and_transform, variant_key,
    },
    config::StampConfig,
    image::{ImageTarget, generate_favicon},
    log,
    logger::log_elapsed,
};
use anyhow::{Context, Result};
use std::{path::Path, time::Instant};

/// Manifest plus per-phase counts of one run.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub manifest: AssetManifest,
    pub assets: ScanReport,
    pub images: ScanReport,
}

impl BuildOutput {
    /// Files written by this run, across all phases.
    pub const fn published(&self) -> usize {
        self.assets.published + self.images.published
    }
}

/// Run the whole pipeline and return the populated manifest.
pub fn build_manifest(config: &StampConfig) -> BuildOutput {
    let start = Instant::now();
    let mut output = BuildOutput {
        manifest: AssetManifest::new(&config.assets.root, &config.assets.r#gen),
        ..BuildOutput::default()
    };

    output.assets = minify_assets(config, &mut output.manifest.minified);
    output.assets.merge(combine_bundles(config, &mut output.manifest.minified));
    log_elapsed("asset fingerprinting", start);

    let images_start = Instant::now();
    output.images = optimize_images(config, &mut output.manifest);
    log_elapsed("image optimization", images_start);

    if config.favicon.enable {
        run_favicon(config);
    }

    log_summary(&output);
    output
}

/// `stamp build`: run the pipeline, optionally dumping the manifest.
pub fn build_assets(config: &StampConfig, manifest_path: Option<&Path>) -> Result<BuildOutput> {
    let output = build_manifest(config);
    if let Some(path) = manifest_path {
        write_manifest(path, &output.manifest)?;
        log!("build"; "manifest written to {}", path.display());
    }
    Ok(output)
}

/// `stamp favicon`
pub fn run_favicon(config: &StampConfig) {
    let start = Instant::now();
    match generate_favicon(&config.favicon) {
        Ok(Some(_)) => log_elapsed("favicon", start),
        Ok(None) => {}
        Err(err) => log!("error"; "favicon generation failed: {:#}", err),
    }
}

/// Serialize the manifest as pretty JSON and publish it atomically.
pub fn write_manifest(path: &Path, manifest: &AssetManifest) -> Result<()> {
    let json = serde_json::to_vec_pretty(manifest).context("Failed to serialize manifest")?;
    publish_atomic(path, &json)
        .with_context(|| format!("Failed to write manifest {}", path.display()))?;
    Ok(())
}

fn minify_assets(config: &StampConfig, map: &mut AssetMap) -> ScanReport {
    let mut report = ScanReport::default();
    for entry in &config.assets.minify {
        for ext in &entry.extensions {
            report.merge(scan_and_transform(&entry.source, &entry.output, ext, &Minify, map));
        }
    }
    report
}

fn combine_bundles(config: &StampConfig, map: &mut AssetMap) -> ScanReport {
    let mut report = ScanReport::default();
    for bundle in &config.assets.bundle {
        match combine(&bundle.output, &bundle.inputs, &Minify, map) {
            Ok(derived) => {
                crate::debug!("bundle"; "{} -> {}", derived.key, derived.path.display());
                report.merge(ScanReport::from(derived.outcome));
            }
            Err(err) => {
                report.failed += 1;
                log!("bundle"; "skipping {}: {:#}", bundle.output.display(), anyhow::Error::from(err));
            }
        }
    }
    report
}

fn optimize_images(config: &StampConfig, manifest: &mut AssetManifest) -> ScanReport {
    let target = ImageTarget::from_config(&config.images);
    let mut report = ScanReport::default();

    for entry in &config.images.convert {
        for ext in &entry.extensions {
            report.merge(scan_and_transform(
                &entry.source,
                &entry.output,
                ext,
                &target,
                &mut manifest.optimized,
            ));

            for &width in &config.images.widths {
                let mut sized = AssetMap::new(&config.assets.root, &config.assets.r#gen);
                report.merge(scan_and_transform(
                    &entry.source,
                    &entry.output,
                    ext,
                    &target.with_width(width),
                    &mut sized,
                ));
                manifest.variants.absorb(sized, |key| variant_key(key, width));
            }
        }
    }
    report
}

fn log_summary(output: &BuildOutput) {
    let manifest = &output.manifest;
    if manifest.minified.is_empty() && manifest.optimized.is_empty() {
        log!("warning"; "no assets were published");
        return;
    }
    if output.published() == 0 {
        crate::debug!("build"; "all artifacts up to date");
    }
    log!("build"; "manifest: {} minified, {} optimized, {} variants",
        manifest.minified.len(),
        manifest.optimized.len(),
        manifest.variants.len());

    for (phase, report) in [("assets", output.assets), ("images", output.images)] {
        if report.total() == 0 {
            continue;
        }
        log!("build"; "{}: {} published, {} cached, {} failed",
            phase,
            report.published,
            report.cached,
            report.failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use std::path::PathBuf;
    use std::time::SystemTime;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[[assets.bundle]]
output = "static/gen/site.css"
inputs = ["static/styles/base.css", "static/styles/theme.css"]

[images]
widths = [4]

[favicon]
enable = false
"#;

    fn site() -> (TempDir, StampConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let styles = root.join("static/styles");
        let img = root.join("static/img");
        fs::create_dir_all(&styles).unwrap();
        fs::create_dir_all(&img).unwrap();

        fs::write(root.join("static/style.css"), ".btn{color:red}").unwrap();
        fs::write(root.join("static/app.js"), "var answer = 40 + 2;\n").unwrap();
        fs::write(styles.join("base.css"), "body { margin: 0 }").unwrap();
        fs::write(styles.join("theme.css"), "body { color: #333 }").unwrap();

        for name in ["a", "b", "c", "d"] {
            RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]))
                .save(img.join(format!("{name}.png")))
                .unwrap();
        }
        fs::write(img.join("corrupt.png"), b"not an image").unwrap();

        let mut config = StampConfig::from_str(CONFIG).unwrap();
        config.set_root(root);
        (dir, config)
    }

    fn published_path(config: &StampConfig, url: &str) -> PathBuf {
        config.assets.root.join(url.trim_start_matches('/'))
    }

    fn mtimes(dir: &Path) -> Vec<(PathBuf, SystemTime)> {
        let mut out: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().is_file())
            .map(|e| (e.path(), e.metadata().unwrap().modified().unwrap()))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_pipeline_populates_manifest() {
        let (_dir, config) = site();
        let output = build_manifest(&config);
        let manifest = &output.manifest;

        let style = manifest.minify("style.css");
        assert!(style.starts_with("/gen/style.min."), "{style}");
        assert!(style.ends_with(".css"));
        assert_eq!(
            fs::read_to_string(published_path(&config, &style)).unwrap(),
            ".btn{color:red}"
        );

        assert!(manifest.minify("app.js").starts_with("/gen/app.min."));

        let bundle = manifest.minify("site.css");
        assert!(bundle.starts_with("/gen/site.min."), "{bundle}");
        assert!(published_path(&config, &bundle).is_file());

        assert_eq!(manifest.optimized.len(), 4);
        let image = manifest.optimize("img/a.png");
        assert!(image.starts_with("/gen/img/a."), "{image}");
        assert!(image.ends_with(".webp"));

        let variant = manifest.optimize_width("img/a.png", 4);
        assert!(variant.starts_with("/gen/img/a_4x."), "{variant}");
        assert_eq!(manifest.optimize("img/corrupt.png"), "/");

        assert_eq!(output.images.failed, 2);
        assert_eq!(output.assets.failed, 0);
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let (_dir, config) = site();
        let first = build_manifest(&config);
        let gen_dir = config.assets.r#gen.clone();
        let before = mtimes(&gen_dir);

        let second = build_manifest(&config);
        assert_eq!(second.published(), 0);
        assert_eq!(second.assets.cached, first.assets.total());
        assert_eq!(second.manifest.minified, first.manifest.minified);
        assert_eq!(second.manifest.optimized, first.manifest.optimized);
        assert_eq!(second.manifest.variants, first.manifest.variants);
        assert_eq!(mtimes(&gen_dir), before);
    }

    #[test]
    fn test_missing_bundle_input_skips_only_that_bundle() {
        let (dir, config) = site();
        fs::remove_file(dir.path().join("static/styles/theme.css")).unwrap();

        let output = build_manifest(&config);
        assert_eq!(output.manifest.minify("site.css"), "/");
        assert!(!dir.path().join("static/gen/site.css").exists());
        assert_eq!(output.assets.failed, 1);
        assert!(output.manifest.minify("style.css").starts_with("/gen/"));
    }

    #[test]
    fn test_write_manifest_json() {
        let (dir, config) = site();
        let path = dir.path().join("manifest.json");
        let output = build_assets(&config, Some(&path)).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(
            format!("/{}", json["minified"]["style.css"].as_str().unwrap()),
            output.manifest.minify("style.css")
        );
        assert!(json["variants"]["img/a.png@4"].is_string());
    }
}
