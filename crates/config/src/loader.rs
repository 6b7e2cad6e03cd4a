//! Configuration loader for stepdag
//!
//! Sources are layered as defaults, then an optional JSON file, then the
//! environment. The merged result is validated before it is returned.

use crate::config::PlannerConfig;
use std::path::{Path, PathBuf};
use stepdag_core::{Error, Result};

/// Loader that merges every configuration source
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Optional JSON file to read
    file: Option<PathBuf>,
    /// Whether `STEPDAG_*` variables are consulted
    use_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            file: None,
            use_env: true,
        }
    }

    /// Read settings from a JSON file
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Enable or disable environment overrides
    pub fn use_env(mut self, enabled: bool) -> Self {
        self.use_env = enabled;
        self
    }

    /// Load and validate the configuration
    pub fn load(self) -> Result<PlannerConfig> {
        let mut config = match &self.file {
            Some(path) => read_config_file(path)?,
            None => PlannerConfig::default(),
        };

        if self.use_env {
            config = config.apply_env()?;
        }

        config.validate()?;
        tracing::debug!(?config, "planner configuration loaded");
        Ok(config)
    }
}

/// Parse a `PlannerConfig` from a JSON file
pub fn read_config_file(path: &Path) -> Result<PlannerConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::file_system(path, "read", e))?;
    parse_config(&content).map_err(|e| {
        Error::configuration(format!("invalid config file '{}': {e}", path.display()))
    })
}

/// Parse a `PlannerConfig` from JSON text
pub fn parse_config(content: &str) -> Result<PlannerConfig> {
    Ok(serde_json::from_str(content)?)
}
