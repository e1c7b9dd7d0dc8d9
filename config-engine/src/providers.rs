// Configuration providers: built-in defaults, an optional file, then environment
use crate::error::{ConfigError, Result};
use crate::settings::EngineConfig;
use crate::validation::validate;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_ENV_PREFIX: &str = "TRIAGE";

/// Layered configuration loader
///
/// Later layers override earlier ones. Environment keys use `__` between
/// nesting levels, e.g. `TRIAGE_FUSION__TOP_N=3`.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Add a YAML, TOML or JSON file layer; the format follows the extension
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Merge all layers, deserialize and validate
    pub fn load(&self) -> Result<EngineConfig> {
        let defaults = config::Config::try_from(&EngineConfig::default())?;
        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(ConfigError::SourceNotFound(path.display().to_string()));
            }
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let engine_config: EngineConfig = builder.build()?.try_deserialize()?;
        validate(&engine_config)?;
        Ok(engine_config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
