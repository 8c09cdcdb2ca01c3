//! Class-name extraction from HTML templates.
//!
//! Collects every class used in `class="..."` / `class='...'` attributes so
//! stylesheet bundles can be checked against what templates actually use.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use jwalk::WalkDir;
use regex::Regex;
use rustc_hash::FxHashSet;

static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="([^"]+)"|class='([^']+)'"#).unwrap()
});

/// Ordered set of class names, in first-seen order.
#[derive(Debug, Default)]
pub struct ClassNames {
    seen: FxHashSet<String>,
    names: Vec<String>,
}

impl ClassNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every class found in `content`.
    pub fn extend_from_str(&mut self, content: &str) {
        for caps in CLASS_ATTR.captures_iter(content) {
            let Some(list) = caps.get(1).or_else(|| caps.get(2)) else {
                continue;
            };
            for class in list.as_str().split_whitespace() {
                if self.seen.insert(class.to_string()) {
                    self.names.push(class.to_string());
                }
            }
        }
    }

    /// Add every class found in the file at `path`.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read template {}", path.display()))?;
        self.extend_from_str(&content);
        Ok(())
    }

    #[cfg(test)]
    pub fn contains(&self, class: &str) -> bool {
        self.seen.contains(class)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Collect class names from every file under `dir` (recursive, sorted walk).
pub fn collect_class_names(dir: &Path) -> Result<ClassNames> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect();
    files.sort();

    let mut classes = ClassNames::new();
    for file in files {
        classes.extend_from_file(&file)?;
    }
    Ok(classes)
}
