//! `[assets]` section configuration.
//!
//! Stylesheets and scripts to minify and fingerprint, plus ordered bundles.
//!
//! # Example
//!
//! ```toml
//! [assets]
//! root = "static"          # mapping keys are relative to this directory
//! gen = "static/gen"       # generated files; bundle keys are relative to this
//!
//! [[assets.minify]]
//! source = "static"
//! output = "static/gen"
//! extensions = ["css", "js"]
//!
//! [[assets.bundle]]
//! output = "static/gen/site.css"
//! inputs = ["static/styles/base.css", "static/styles/utils.css"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Static root; mapping keys and values are relative to it.
    pub root: PathBuf,

    /// Generated-output directory.
    pub r#gen: PathBuf,

    /// Directories to minify, one scan per extension.
    pub minify: Vec<MinifyEntry>,

    /// Bundles, combined in declaration order.
    pub bundle: Vec<BundleEntry>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: "static".into(),
            r#gen: "static/gen".into(),
            minify: vec![MinifyEntry::default()],
            bundle: vec![],
        }
    }
}

/// One `[[assets.minify]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyEntry {
    pub source: PathBuf,
    pub output: PathBuf,
    pub extensions: Vec<String>,
}

impl Default for MinifyEntry {
    fn default() -> Self {
        Self {
            source: "static".into(),
            output: "static/gen".into(),
            extensions: vec!["css".into(), "js".into()],
        }
    }
}

/// One `[[assets.bundle]]` entry. Input order is significant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleEntry {
    pub output: PathBuf,
    pub inputs: Vec<PathBuf>,
}

impl AssetsConfig {
    pub const MINIFY: FieldPath = FieldPath::new("assets.minify");
    pub const BUNDLE: FieldPath = FieldPath::new("assets.bundle");

    pub fn normalize_paths(&mut self, root: &Path) {
        self.root = root.join(&self.root);
        self.r#gen = root.join(&self.r#gen);
        for entry in &mut self.minify {
            entry.source = root.join(&entry.source);
            entry.output = root.join(&entry.output);
        }
        for entry in &mut self.bundle {
            entry.output = root.join(&entry.output);
            for input in &mut entry.inputs {
                *input = root.join(&*input);
            }
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (idx, entry) in self.minify.iter().enumerate() {
            if entry.extensions.is_empty() {
                diag.error(Self::MINIFY, format!("[{idx}] no extensions listed"));
            }
        }
        for (idx, entry) in self.bundle.iter().enumerate() {
            if entry.output.as_os_str().is_empty() {
                diag.error(Self::BUNDLE, format!("[{idx}] missing `output`"));
            }
            if entry.inputs.is_empty() {
                diag.error_with_hint(
                    Self::BUNDLE,
                    format!("[{idx}] bundle '{}' has no inputs", entry.output.display()),
                    "list the files to combine in `inputs`, in cascade order",
                );
            }
        }
    }
}
