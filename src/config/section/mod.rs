//! Configuration section definitions.

mod assets;
mod favicon;
mod images;

pub use assets::AssetsConfig;
pub use favicon::FaviconConfig;
pub use images::{ImageFormat, ImagesConfig};
