//! Content-addressed asset pipeline.
//!
//! ```text
//! hash        bytes → ContentHash
//! transform   read → derive → hash → skip-or-publish → register
//! publish     temp file + rename
//! scan        one directory, one extension, per-file isolation
//! bundle      ordered concat → publish → transform
//! manifest    name → published path, template lookups
//! ```

mod bundle;
pub mod classes;
mod error;
mod hash;
mod kind;
mod manifest;
pub mod minify;
mod publish;
mod scan;
mod transform;

pub use bundle::combine;
pub use error::AssetError;
pub use hash::ContentHash;
pub use kind::AssetKind;
pub use manifest::{AssetManifest, AssetMap, variant_key};
pub use publish::{publish_atomic, publish_if_changed};
pub use scan::{ScanReport, scan_and_transform};
pub use transform::{Minify, Transformer};

pub(crate) use transform::split_name;
