//! Configuration loading and resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: a warning is logged and defaults
//! apply. A TOML file that exists but does not parse is.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::classifier::ClusterOptions;
use crate::kmeans::DEFAULT_SEED;
use crate::segment::Revision;
use crate::{Error, Result};

pub const ENV_BIND: &str = "MALLSEG_BIND";
pub const ENV_PORT: &str = "MALLSEG_PORT";
pub const ENV_REVISION: &str = "MALLSEG_REVISION";
pub const ENV_DATASET: &str = "MALLSEG_DATASET";

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_DATASET: &str = "data/mall_customers.csv";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// On-disk TOML configuration; every field is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub server: ServerSection,
    pub classifier: ClassifierSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierSection {
    pub revision: Option<Revision>,
    pub dataset: Option<PathBuf>,
    pub seed: Option<u64>,
    pub income_weight: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub revision: Option<Revision>,
    pub dataset: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind: String,
    pub port: u16,
    pub revision: Revision,
    pub dataset: PathBuf,
    pub seed: u64,
    pub income_weight: Option<f64>,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            revision: Revision::default(),
            dataset: PathBuf::from(DEFAULT_DATASET),
            seed: DEFAULT_SEED,
            income_weight: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve from CLI, environment, the TOML file and defaults
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let toml = match locate_config_file(cli.config_file.as_deref()) {
            Some(path) => load_toml_config(&path)?,
            None => TomlConfig::default(),
        };
        Self::merge(cli, &toml)
    }

    /// Merge already-loaded sources without touching the filesystem
    pub fn merge(cli: &CliOverrides, toml: &TomlConfig) -> Result<Self> {
        let defaults = Self::default();

        let bind = cli
            .bind
            .clone()
            .or(env_string(ENV_BIND))
            .or(toml.server.bind.clone())
            .unwrap_or(defaults.bind);

        let port = match cli.port {
            Some(port) => port,
            None => match env_parsed::<u16>(ENV_PORT)? {
                Some(port) => port,
                None => toml.server.port.unwrap_or(defaults.port),
            },
        };

        let revision = match cli.revision {
            Some(revision) => revision,
            None => match env_parsed::<Revision>(ENV_REVISION)? {
                Some(revision) => revision,
                None => toml.classifier.revision.unwrap_or(defaults.revision),
            },
        };

        let dataset = cli
            .dataset
            .clone()
            .or(env_string(ENV_DATASET).map(PathBuf::from))
            .or(toml.classifier.dataset.clone())
            .unwrap_or(defaults.dataset);

        Ok(Self {
            bind,
            port,
            revision,
            dataset,
            seed: toml.classifier.seed.unwrap_or(defaults.seed),
            income_weight: toml.classifier.income_weight,
            log_level: toml.logging.level.clone().unwrap_or(defaults.log_level),
        })
    }

    pub fn cluster_options(&self) -> ClusterOptions {
        ClusterOptions {
            seed: self.seed,
            income_weight: self.income_weight,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_string(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| Error::Config(format!("{}='{}': {}", name, raw, e)))
        })
        .transpose()
}

/// Pick the config file to read
///
/// An explicit path wins. Otherwise `<config dir>/mallseg/config.toml`.
/// Returns `None` (with a warning) when the file does not exist.
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    }?;

    if candidate.exists() {
        Some(candidate)
    } else {
        warn!(
            "Config file {} not found, using defaults",
            candidate.display()
        );
        None
    }
}

/// Platform config location, e.g. ~/.config/mallseg/config.toml on Linux
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mallseg").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    info!("Loaded config file {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_file() {
        let toml = r#"
            [server]
            bind = "0.0.0.0"
            port = 8080

            [classifier]
            revision = "kmeans6"
            dataset = "/srv/mall.csv"
            seed = 7
            income_weight = 2.0

            [logging]
            level = "debug"
        "#;
        let config: TomlConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, Some(8080));
        assert_eq!(config.classifier.revision, Some(Revision::Kmeans6));
        assert_eq!(config.classifier.income_weight, Some(2.0));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(toml::from_str::<TomlConfig>("[server]\nhost = \"x\"\n").is_err());
        assert!(toml::from_str::<TomlConfig>("[classifier]\nrevision = \"kmeans9\"\n").is_err());
    }
}
