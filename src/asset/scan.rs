//! Directory-scan driver.
//!
//! Lists the immediate entries of a source directory that match one
//! extension and runs a transform on each. A failing file is logged and
//! skipped; the driver itself never fails.

use std::fs;
use std::path::{Path, PathBuf};

use super::manifest::AssetMap;
use super::transform::{Outcome, Transformer, transform_file};

/// Per-outcome counts of one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub cached: usize,
    pub published: usize,
    pub failed: usize,
}

impl ScanReport {
    pub const fn total(&self) -> usize {
        self.cached + self.published + self.failed
    }

    pub fn merge(&mut self, other: ScanReport) {
        self.cached += other.cached;
        self.published += other.published;
        self.failed += other.failed;
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Cached => self.cached += 1,
            Outcome::Published | Outcome::Raced => self.published += 1,
        }
    }
}

impl From<Outcome> for ScanReport {
    fn from(outcome: Outcome) -> Self {
        let mut report = Self::default();
        report.record(outcome);
        report
    }
}

/// Transform every `ext` file directly inside `source_dir` into `output_dir`.
pub fn scan_and_transform(
    source_dir: &Path,
    output_dir: &Path,
    ext: &str,
    transformer: &dyn Transformer,
    map: &mut AssetMap,
) -> ScanReport {
    let mut report = ScanReport::default();

    if let Err(err) = fs::create_dir_all(output_dir) {
        crate::log!("error"; "failed to create directory {}: {}", output_dir.display(), err);
    }

    let files = match matching_files(source_dir, ext) {
        Ok(files) => files,
        Err(err) => {
            crate::log!("error"; "failed to read directory {}: {}", source_dir.display(), err);
            return report;
        }
    };

    for file in files {
        match transform_file(&file, output_dir, transformer, map) {
            Ok(derived) => report.record(derived.outcome),
            Err(err) => {
                report.failed += 1;
                crate::log!("error"; "skipping {} ({}): {:#}", file.display(), err.kind(),
                    anyhow::Error::from(err));
            }
        }
    }

    report
}

/// Regular files in `dir` (non-recursive) whose extension equals `ext`, sorted.
pub fn matching_files(dir: &Path, ext: &str) -> std::io::Result<Vec<PathBuf>> {
    let wanted = ext.trim_start_matches('.');
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|e| e == wanted))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Minify;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("static");
        let gen_dir = root.join("gen");
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("a.css"), ".a { color: red }").unwrap();
        fs::write(root.join("b.css"), ".b { color: blue }").unwrap();
        fs::write(root.join("app.js"), "var x = 1;").unwrap();
        fs::write(root.join("nested/c.css"), ".c { color: green }").unwrap();
        (dir, root, gen_dir)
    }

    #[test]
    fn test_matching_files_is_flat_and_filtered() {
        let (_dir, root, _) = setup();
        let files = matching_files(&root, ".css").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.css", "b.css"]);
    }

    #[test]
    fn test_scan_creates_output_and_maps_files() {
        let (_dir, root, gen_dir) = setup();
        let mut map = AssetMap::new(&root, &gen_dir);

        let report = scan_and_transform(&root, &gen_dir, ".css", &Minify, &mut map);
        assert_eq!(report.published, 2);
        assert_eq!(report.failed, 0);
        assert!(gen_dir.is_dir());
        assert!(map.get("a.css").unwrap().starts_with("gen/a.min."));
        assert!(map.get("b.css").unwrap().starts_with("gen/b.min."));
        assert!(map.get("nested/c.css").is_none());
        assert!(map.get("app.js").is_none());
    }

    #[test]
    fn test_scan_twice_publishes_nothing_new() {
        let (_dir, root, gen_dir) = setup();
        let mut first = AssetMap::new(&root, &gen_dir);
        scan_and_transform(&root, &gen_dir, "css", &Minify, &mut first);

        let mut second = AssetMap::new(&root, &gen_dir);
        let report = scan_and_transform(&root, &gen_dir, "css", &Minify, &mut second);
        assert_eq!(report.published, 0);
        assert_eq!(report.cached, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_scan_skips_broken_file() {
        let (_dir, root, gen_dir) = setup();
        fs::write(root.join("broken.js"), "const = ;").unwrap();
        let mut map = AssetMap::new(&root, &gen_dir);

        let report = scan_and_transform(&root, &gen_dir, ".js", &Minify, &mut map);
        assert_eq!(report.published, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total(), 2);
        assert!(map.get("app.js").is_some());
        assert!(map.get("broken.js").is_none());
    }

    #[test]
    fn test_scan_missing_source_dir_is_empty_report() {
        let dir = TempDir::new().unwrap();
        let mut map = AssetMap::new(dir.path(), dir.path().join("gen"));
        let report = scan_and_transform(
            &dir.path().join("missing"),
            &dir.path().join("gen"),
            ".css",
            &Minify,
            &mut map,
        );
        assert_eq!(report, ScanReport::default());
        assert!(map.is_empty());
    }
}
