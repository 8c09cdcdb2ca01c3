//! Command-line interface module.

mod args;
pub mod build;
pub mod query;

pub use args::{Cli, Commands};
