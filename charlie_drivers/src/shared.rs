use std::fs;
use std::path::{Path, PathBuf};

use charlie::{Rule, RuleError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = ".charlie.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid policy name: {0}")]
    Policy(#[from] serde::de::value::Error),
    #[error("invalid rule: {0}")]
    Rule(#[from] RuleError),
    #[error("{0} is a directory rather than a file")]
    IsDirectory(PathBuf),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rule: ConfigRule,
    pub table: ConfigTable,
    pub simulator: ConfigSimulator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRule {
    pub charlie_limit: u8,
    pub dealer_stands_on: u8,
    pub reshuffle_policy: String,
    pub dealer_softening: String,
}

impl Default for ConfigRule {
    fn default() -> Self {
        ConfigRule {
            charlie_limit: 5,
            dealer_stands_on: 17,
            reshuffle_policy: String::from("ExcludeInPlay"),
            dealer_softening: String::from("ChasePlayer"),
        }
    }
}

impl TryFrom<ConfigRule> for Rule {
    type Error = ConfigError;

    fn try_from(config: ConfigRule) -> Result<Rule, Self::Error> {
        let rule = Rule {
            charlie_limit: config.charlie_limit,
            dealer_stands_on: config.dealer_stands_on,
            reshuffle_policy: config.reshuffle_policy.parse()?,
            dealer_softening: config.dealer_softening.parse()?,
        };
        rule.validate()?;
        Ok(rule)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigTable {
    /// Fixed deck seed. A random one is used when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSimulator {
    pub rounds: u64,
    pub player_stands_on: u8,
    pub seed: Option<u64>,
}

impl Default for ConfigSimulator {
    fn default() -> Self {
        ConfigSimulator {
            rounds: 10_000,
            player_stands_on: 17,
            seed: None,
        }
    }
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &Path) -> Result<Config, ConfigError> {
    if filename.is_dir() {
        return Err(ConfigError::IsDirectory(filename.to_path_buf()));
    }
    let file_content = fs::read_to_string(filename).map_err(|source| ConfigError::Io {
        path: filename.to_path_buf(),
        source,
    })?;
    Ok(serde_yaml::from_str(&file_content)?)
}

/// `~/.charlie.yml`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    home::home_dir().map(|home_dir| home_dir.join(DEFAULT_CONFIG_FILE))
}

/// Loads the config at `path`. Without a path, `~/.charlie.yml` is read when it
/// exists and the built-in defaults are used otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => parse_config_from_file(path),
        None => match default_config_path() {
            Some(path) if path.exists() => parse_config_from_file(&path),
            _ => {
                log::debug!("no config file found, using defaults");
                Ok(Config::default())
            }
        },
    }
}

/// Logs to stderr. `RUST_LOG` overrides the default `warn` level.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}
