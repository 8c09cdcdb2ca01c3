//! Image processing.
//!
//! # Modules
//!
//! - [`encode`]: WebP/AVIF re-encoding and width variants
//! - [`favicon`]: favicon set, browserconfig.xml, site.webmanifest

pub mod encode;
pub mod favicon;

pub use encode::ImageTarget;
pub use favicon::generate_favicon;
