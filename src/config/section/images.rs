//! `[images]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [images]
//! format = "webp"      # webp | avif
//! quality = 75         # AVIF quality (0-100)
//! speed = 6            # AVIF encoder speed (1 = slowest/best, 10 = fastest)
//! widths = [600]       # extra resized variants
//!
//! [[images.convert]]
//! source = "static/img"
//! output = "static/gen/img"
//! extensions = ["jpeg", "jpg", "png"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Target encoding for optimized images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Webp,
    Avif,
}

impl ImageFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Avif => "avif",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub format: ImageFormat,
    pub quality: u8,
    pub speed: u8,
    pub widths: Vec<u32>,
    pub convert: Vec<ConvertEntry>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            format: ImageFormat::Webp,
            quality: 75,
            speed: 6,
            widths: vec![],
            convert: vec![ConvertEntry::default()],
        }
    }
}

/// One `[[images.convert]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertEntry {
    pub source: PathBuf,
    pub output: PathBuf,
    pub extensions: Vec<String>,
}

impl Default for ConvertEntry {
    fn default() -> Self {
        Self {
            source: "static/img".into(),
            output: "static/gen/img".into(),
            extensions: vec!["jpeg".into(), "jpg".into(), "png".into()],
        }
    }
}

impl ImagesConfig {
    pub const QUALITY: FieldPath = FieldPath::new("images.quality");
    pub const SPEED: FieldPath = FieldPath::new("images.speed");
    pub const WIDTHS: FieldPath = FieldPath::new("images.widths");

    pub fn normalize_paths(&mut self, root: &Path) {
        for entry in &mut self.convert {
            entry.source = root.join(&entry.source);
            entry.output = root.join(&entry.output);
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.quality > 100 {
            diag.error(Self::QUALITY, format!("{} is above 100", self.quality));
        }
        if !(1..=10).contains(&self.speed) {
            diag.error_with_hint(
                Self::SPEED,
                format!("{} is out of range", self.speed),
                "use a value between 1 (slowest) and 10 (fastest)",
            );
        }
        if self.widths.contains(&0) {
            diag.error(Self::WIDTHS, "widths must be greater than 0");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_extension() {
        assert_eq!(ImageFormat::Webp.extension(), "webp");
        assert_eq!(ImageFormat::Avif.extension(), "avif");
    }

    #[test]
    fn test_validate_ranges() {
        let config = ImagesConfig {
            quality: 101,
            speed: 0,
            widths: vec![600, 0],
            ..ImagesConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.errors().len(), 3);
    }

    #[test]
    fn test_default_is_valid() {
        let mut diag = ConfigDiagnostics::new();
        ImagesConfig::default().validate(&mut diag);
        assert!(!diag.has_errors());
    }
}
