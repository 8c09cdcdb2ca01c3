//! Source name → published path mappings and the template lookups over them.
//!
//! A manifest is populated once during startup and then only read. Keys and
//! values are relative to the static root with `/` separators, e.g.
//! `"style.css" -> "gen/style.min.<hash>.css"`.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

/// One `sourceKey -> publishedPath` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssetMap {
    #[serde(skip)]
    root: PathBuf,
    #[serde(skip)]
    gen_dir: PathBuf,
    entries: BTreeMap<String, String>,
}

impl AssetMap {
    /// Create an empty map for assets under `root`, with generated files in `gen_dir`.
    pub fn new(root: impl Into<PathBuf>, gen_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            gen_dir: gen_dir.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Record a published artifact for `source`, returning the key used.
    pub fn register(&mut self, source: &Path, published: &Path) -> String {
        let key = self.source_key(source);
        self.insert(key.clone(), published);
        key
    }

    /// Record a published artifact under an explicit key.
    pub fn insert(&mut self, key: String, published: &Path) {
        let value = relative_slash(published, &self.root)
            .unwrap_or_else(|| slash_path(published));
        self.entries.insert(key, value);
    }

    /// Logical name of a source file.
    ///
    /// Sources inside the generated directory (bundle intermediates) are keyed
    /// relative to it, everything else relative to the static root.
    pub fn source_key(&self, source: &Path) -> String {
        relative_slash(source, &self.gen_dir)
            .or_else(|| relative_slash(source, &self.root))
            .unwrap_or_else(|| slash_path(source))
    }

    /// Move every entry of `other` into `self`, renaming keys on the way.
    pub fn absorb(&mut self, other: AssetMap, rename: impl Fn(&str) -> String) {
        for (key, value) in other.entries {
            self.entries.insert(rename(&key), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Every mapping produced by one startup run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetManifest {
    /// Minified and fingerprinted stylesheets, scripts and bundles.
    pub minified: AssetMap,
    /// Re-encoded images.
    pub optimized: AssetMap,
    /// Resized image variants, keyed `"<name>@<width>"`.
    pub variants: AssetMap,
}

impl AssetManifest {
    pub fn new(root: &Path, gen_dir: &Path) -> Self {
        Self {
            minified: AssetMap::new(root, gen_dir),
            optimized: AssetMap::new(root, gen_dir),
            variants: AssetMap::new(root, gen_dir),
        }
    }

    /// URL of the fingerprinted stylesheet or script for `name`.
    ///
    /// Unknown names resolve to `"/"` rather than failing the render.
    pub fn minify(&self, name: &str) -> String {
        lookup(&self.minified, name, "minify")
    }

    /// URL of the optimized image for `name`, `"/"` when unknown.
    pub fn optimize(&self, name: &str) -> String {
        lookup(&self.optimized, name, "optimize")
    }

    /// URL of the `width`-pixel variant of image `name`, `"/"` when unknown.
    pub fn optimize_width(&self, name: &str, width: u32) -> String {
        lookup(&self.variants, &variant_key(name, width), "optimize")
    }
}

/// Key of a resized image variant.
pub fn variant_key(name: &str, width: u32) -> String {
    format!("{name}@{width}")
}

fn lookup(map: &AssetMap, name: &str, helper: &str) -> String {
    match map.get(name) {
        Some(path) => format!("/{path}"),
        None => {
            crate::debug!("assets"; "{}(\"{}\") has no published asset", helper, name);
            "/".to_string()
        }
    }
}

fn relative_slash(path: &Path, base: &Path) -> Option<String> {
    if base.as_os_str().is_empty() {
        return None;
    }
    path.strip_prefix(base).ok().map(slash_path)
}

fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
