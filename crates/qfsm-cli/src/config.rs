//! CLI configuration.
//!
//! Precedence (highest to lowest):
//! 1. Environment variables (`QFSM_SHOTS`, `QFSM_BACKEND`, `QFSM_LOG`)
//! 2. Configuration file (`--config`, else `~/.qfsm/config.yaml` if present)
//! 3. Default values

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Shots per execution.
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Backend name in the registry.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Log filter used when no `-v` flag is given.
    #[serde(default = "default_log")]
    pub log: String,

    /// Cell limit handed to the simulator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cells: Option<u64>,
}

fn default_shots() -> u32 {
    1024
}

fn default_backend() -> String {
    "simulator".to_string()
}

fn default_log() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shots: default_shots(),
            backend: default_backend(),
            log: default_log(),
            max_cells: None,
        }
    }
}

impl Config {
    /// Load a YAML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Default location of the configuration file (`~/.qfsm/config.yaml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qfsm").join("config.yaml"))
    }

    /// Load the file given on the command line, else the default file if it
    /// exists, then apply environment overrides.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Config::default(),
            },
        };
        let config = config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields with variables that `lookup` finds.
    pub fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(v) = lookup("QFSM_SHOTS") {
            self.shots = v
                .trim()
                .parse()
                .with_context(|| format!("QFSM_SHOTS must be a positive integer, got '{v}'"))?;
        }
        if let Some(v) = lookup("QFSM_BACKEND") {
            self.backend = v;
        }
        if let Some(v) = lookup("QFSM_LOG") {
            self.log = v;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.shots == 0 {
            anyhow::bail!("shots must be at least 1");
        }
        if self.backend.trim().is_empty() {
            anyhow::bail!("backend name cannot be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.shots, 1024);
        assert_eq!(config.backend, "simulator");
        assert_eq!(config.log, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "shots: 64\nmax_cells: 512").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.shots, 64);
        assert_eq!(config.backend, "simulator");
        assert_eq!(config.max_cells, Some(512));
    }

    #[test]
    fn test_from_file_rejects_bad_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "shots: 0").unwrap();
        assert!(Config::from_file(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "shots: [1, 2]").unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "shots: 64\nlog: info").unwrap();
        let config = Config::from_file(file.path()).unwrap();

        let config = config
            .merge_env(|key| match key {
                "QFSM_SHOTS" => Some("8".into()),
                "QFSM_BACKEND" => Some("other".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.shots, 8);
        assert_eq!(config.backend, "other");
        assert_eq!(config.log, "info");
    }

    #[test]
    fn test_env_rejects_garbage_shots() {
        let result = Config::default().merge_env(|key| (key == "QFSM_SHOTS").then(|| "many".into()));
        assert!(result.is_err());
    }
}
