//! `[favicon]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [favicon]
//! enable = true
//! source = "static/img/favicon.png"
//! output = "static/gen/img"
//! name = "My Site"             # site.webmanifest name / short_name
//! theme_color = "#ffffff"      # also used as background_color
//! tile_color = "red"           # browserconfig.xml TileColor
//! display = "standalone"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaviconConfig {
    pub enable: bool,
    pub source: PathBuf,
    pub output: PathBuf,
    pub name: String,
    pub theme_color: String,
    pub tile_color: String,
    pub display: String,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            enable: true,
            source: "static/img/favicon.png".into(),
            output: "static/gen/img".into(),
            name: String::new(),
            theme_color: String::new(),
            tile_color: "red".into(),
            display: String::new(),
        }
    }
}

impl FaviconConfig {
    pub const SOURCE: FieldPath = FieldPath::new("favicon.source");

    pub fn normalize_paths(&mut self, root: &Path) {
        self.source = root.join(&self.source);
        self.output = root.join(&self.output);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.enable && self.source.as_os_str().is_empty() {
            diag.error(Self::SOURCE, "favicon is enabled but no source image is set");
        }
    }
}
