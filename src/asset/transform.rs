//! Single-file transform: read, derive, hash, publish, register.

use std::fs;
use std::path::{Path, PathBuf};

use super::manifest::AssetMap;
use super::minify::minify_by_ext;
use super::publish::{Publish, publish_atomic};
use super::{AssetError, ContentHash};

/// A pure byte transform with a content-addressed output naming scheme.
pub trait Transformer: Sync {
    /// Log module tag for this transform.
    fn name(&self) -> &'static str;

    /// Derive the published bytes from the source bytes.
    fn apply(&self, source: &Path, bytes: &[u8]) -> Result<Vec<u8>, AssetError>;

    /// Output file name for `source` given the hash of the derived bytes.
    fn file_name(&self, source: &Path, hash: &ContentHash) -> String;
}

/// Minify stylesheets and scripts: `<stem>.min.<hash><ext>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Minify;

impl Transformer for Minify {
    fn name(&self) -> &'static str {
        "assets"
    }

    fn apply(&self, source: &Path, bytes: &[u8]) -> Result<Vec<u8>, AssetError> {
        minify_by_ext(source, bytes).map_err(|reason| AssetError::transform(source, reason))
    }

    fn file_name(&self, source: &Path, hash: &ContentHash) -> String {
        let (stem, ext) = split_name(source);
        let stem = stem.strip_suffix(".min").unwrap_or(stem);
        format!("{stem}.min.{}{ext}", hash.to_hex())
    }
}

/// How a transform invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The artifact already existed; nothing was written.
    Cached,
    /// This invocation published the artifact.
    Published,
    /// A concurrent sibling published it first.
    Raced,
}

/// A successfully derived artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derived {
    pub key: String,
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Transform one source file into `output_dir` and record it in `map`.
pub fn transform_file(
    source: &Path,
    output_dir: &Path,
    transformer: &dyn Transformer,
    map: &mut AssetMap,
) -> Result<Derived, AssetError> {
    let bytes = fs::read(source).map_err(|err| AssetError::Read {
        path: source.to_path_buf(),
        source: err,
    })?;
    let derived = transformer.apply(source, &bytes)?;
    let (path, outcome) = publish_derived(source, output_dir, transformer, &derived)?;
    let key = map.register(source, &path);
    Ok(Derived { key, path, outcome })
}

/// Hash derived bytes, then skip or publish the content-addressed file.
pub(crate) fn publish_derived(
    source: &Path,
    output_dir: &Path,
    transformer: &dyn Transformer,
    derived: &[u8],
) -> Result<(PathBuf, Outcome), AssetError> {
    let hash = ContentHash::of(derived);
    let path = output_dir.join(transformer.file_name(source, &hash));

    if path.is_file() {
        crate::debug!(transformer.name(); "cached {}", path.display());
        return Ok((path, Outcome::Cached));
    }

    let outcome = match publish_atomic(&path, derived)? {
        Publish::Written => Outcome::Published,
        Publish::Raced => Outcome::Raced,
    };
    crate::log!(transformer.name(); "{} -> {}", source.display(), path.display());
    Ok((path, outcome))
}

/// Split a file name into stem and extension (with dot): `style.css` → (`style`, `.css`).
pub(crate) fn split_name(path: &Path) -> (&str, String) {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    (stem, ext)
}
