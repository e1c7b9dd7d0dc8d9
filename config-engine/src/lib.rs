//! Layered configuration for the triage engine
//!
//! This module provides configuration management with:
//! - Built-in defaults carrying the tuned scoring constants
//! - An optional YAML, TOML or JSON file
//! - `TRIAGE_*` environment overrides
//! - Validation before anything reaches the engine
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new()
//!     .with_file("triage.yaml")
//!     .load()?;
//!
//! println!("fusion weights: {} / {}", config.fusion.structured_weight, config.fusion.text_weight);
//! # Ok(())
//! # }
//! ```

pub mod settings;
pub mod providers;
pub mod validation;
pub mod error;

pub use settings::*;
pub use providers::*;
pub use validation::validate;
pub use error::*;
