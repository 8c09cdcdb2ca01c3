//! Bundle combiner.
//!
//! Concatenates inputs in the given order (later CSS rules override earlier
//! ones), publishes the intermediate file, then fingerprints it like any
//! other source. A missing input invalidates the whole bundle.

use std::fs;
use std::path::{Path, PathBuf};

use super::AssetError;
use super::manifest::AssetMap;
use super::publish::publish_if_changed;
use super::transform::{Derived, Transformer, transform_file};

/// Written after every input.
const SEPARATOR: &[u8] = b"\n\n";

/// Combine `inputs` into `output`, then fingerprint the result into `output`'s directory.
pub fn combine(
    output: &Path,
    inputs: &[PathBuf],
    transformer: &dyn Transformer,
    map: &mut AssetMap,
) -> Result<Derived, AssetError> {
    let combined = concat_inputs(output, inputs)?;

    publish_if_changed(output, &combined)?;

    let output_dir = output.parent().unwrap_or(Path::new(""));
    transform_file(output, output_dir, transformer, map)
}

/// Read every input up front so nothing is written when one is missing.
fn concat_inputs(output: &Path, inputs: &[PathBuf]) -> Result<Vec<u8>, AssetError> {
    let mut combined = Vec::new();
    for input in inputs {
        let bytes = fs::read(input).map_err(|err| AssetError::Combine {
            output: output.to_path_buf(),
            input: input.clone(),
            source: err,
        })?;
        combined.extend_from_slice(&bytes);
        combined.extend_from_slice(SEPARATOR);
    }
    Ok(combined)
}
