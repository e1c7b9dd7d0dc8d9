//! Command-line front end for the triage engine
//!
//! Runs assessments from JSON input files and exposes the symptom
//! vocabulary and model manifest for field setup.

pub mod cli;
pub mod commands;
pub mod output;

pub use cli::{Cli, Command};

use config_engine::{ConfigLoader, EngineConfig};
use error_common::Result;

/// Load configuration for a parsed command line; `--verbose` forces debug logging
pub fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let mut config = loader.load()?;
    if cli.verbose {
        config.logging.log_level = "debug".to_string();
    }
    Ok(config)
}
