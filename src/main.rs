//! Stamp - a content-addressed asset pipeline for static sites.

mod asset;
mod cli;
mod config;
mod image;
mod logger;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::StampConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    // Template scanning needs no config
    if let Commands::Classes { dir } = &cli.command {
        return cli::query::run_classes(dir);
    }

    let config = StampConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { manifest } => {
            cli::build::build_assets(&config, manifest.as_deref()).map(|_| ())
        }
        Commands::Lookup { name, optimize, width } => {
            cli::query::run_lookup(&config, name, *optimize, *width)
        }
        Commands::Favicon => {
            cli::build::run_favicon(&config);
            Ok(())
        }
        Commands::Classes { .. } => Ok(()),
    }
}
