//! Pipeline configuration management for `stamp.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [assets], [images], [favicon]
//! ├── types/         # ConfigError, diagnostics, field paths
//! ├── util.rs        # config file discovery
//! └── mod.rs         # StampConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section       | Purpose                                             |
//! |---------------|-----------------------------------------------------|
//! | `[assets]`    | Static root, generated dir, minify scans, bundles   |
//! | `[images]`    | Target format, quality, widths, conversion scans    |
//! | `[favicon]`   | Favicon set, browserconfig.xml, site.webmanifest    |
//!
//! Relative paths are resolved against the directory holding the config file.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{AssetsConfig, FaviconConfig, ImageFormat, ImagesConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{cli::Cli, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing stamp.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StampConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Stylesheets, scripts and bundles
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Image conversion
    #[serde(default)]
    pub images: ImagesConfig,

    /// Favicon generation
    #[serde(default)]
    pub favicon: FaviconConfig,
}

impl StampConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// Searches upward from cwd for the config file. Without one, the
    /// defaults apply relative to cwd.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cwd, &cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => {
                log!("warning"; "{} not found, using defaults", cli.config.display());
                Self::default()
            }
        };

        config.validate()?;

        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);
        config.set_root(&root);
        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} are ignored:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Validate all sections, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.assets.validate(&mut diag);
        self.images.validate(&mut diag);
        self.favicon.validate(&mut diag);
        diag.into_result()
    }

    /// Set the root directory and resolve every configured path against it.
    pub fn set_root(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        self.assets.normalize_paths(root);
        self.images.normalize_paths(root);
        self.favicon.normalize_paths(root);
    }
}
