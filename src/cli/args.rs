//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Content-addressed asset pipeline for static sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: stamp.toml)
    #[arg(short = 'C', long, global = true, default_value = "stamp.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Minify, bundle and fingerprint assets, convert images, generate favicons
    #[command(visible_alias = "b")]
    Build {
        /// Write the resulting manifest as JSON to this file
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        manifest: Option<PathBuf>,
    },

    /// Resolve a source name to its published URL, as templates do
    #[command(visible_alias = "l")]
    Lookup {
        /// Source name relative to the static root, e.g. `style.css`
        name: String,

        /// Look up an optimized image instead of a minified asset
        #[arg(short, long)]
        optimize: bool,

        /// Look up the resized variant of this width (implies --optimize)
        #[arg(short, long)]
        width: Option<u32>,
    },

    /// Generate only the favicon set
    #[command(visible_alias = "f")]
    Favicon,

    /// List class names used by templates under a directory
    #[command(visible_alias = "c")]
    Classes {
        /// Template directory to scan recursively
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: PathBuf,
    },
}
