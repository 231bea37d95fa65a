//! Engine configuration.
//!
//! Values come from the environment, optionally seeded by a `.env` file in the
//! working directory. Command line flags override whatever is found here.
//!
//! - MINISQL_OUTPUT: `table` or `json`
//! - MINISQL_HISTORY_LIMIT: number of commands a session remembers
//! - MINISQL_LOG: an `env_logger` filter, e.g. `debug` or `minisql_engine=trace`

use std::fmt::Display;
use std::str::FromStr;

use clap::ValueEnum;
use log::debug;
use serde::Deserialize;

use crate::error::{EngineError, Result};

pub const ENV_OUTPUT: &str = "MINISQL_OUTPUT";
pub const ENV_HISTORY_LIMIT: &str = "MINISQL_HISTORY_LIMIT";
pub const ENV_LOG: &str = "MINISQL_LOG";

const DEFAULT_HISTORY_LIMIT: usize = 500;
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // An ASCII grid, one line per row.
    #[default]
    Table,

    // A JSON array with one object per row.
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub output_format: OutputFormat,
    pub history_limit: usize,
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            output_format: OutputFormat::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<EngineConfig> {
        //! Load `.env` if there is one, then read the process environment.

        match dotenvy::dotenv() {
            Ok(path) => debug!("loaded environment from {}", path.display()),
            Err(error) if error.not_found() => {}
            Err(error) => return Err(EngineError::Config(error.to_string())),
        }

        EngineConfig::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<EngineConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        //! Build a config from any key/value source. Unset keys keep their default.

        let mut config = EngineConfig::default();

        if let Some(value) = lookup(ENV_OUTPUT) {
            config.output_format = value.parse()?;
        }

        if let Some(value) = lookup(ENV_HISTORY_LIMIT) {
            config.history_limit = value.trim().parse().map_err(|_| {
                EngineError::Config(format!(
                    "{} must be a non-negative integer, got '{}'",
                    ENV_HISTORY_LIMIT, value
                ))
            })?;
        }

        if let Some(value) = lookup(ENV_LOG).or_else(|| lookup("RUST_LOG")) {
            if !value.trim().is_empty() {
                config.log_filter = value;
            }
        }

        Ok(config)
    }
}

impl FromStr for OutputFormat {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(EngineError::Config(format!(
                "{} must be 'table' or 'json', got '{}'",
                ENV_OUTPUT, other
            ))),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = EngineConfig::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn reads_every_key() {
        let config = EngineConfig::from_lookup(lookup_in(&[
            (ENV_OUTPUT, "JSON"),
            (ENV_HISTORY_LIMIT, "10"),
            (ENV_LOG, "debug"),
        ]))
        .unwrap();

        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn falls_back_to_rust_log() {
        let config = EngineConfig::from_lookup(lookup_in(&[("RUST_LOG", "info")])).unwrap();
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_lookup(lookup_in(&[(ENV_OUTPUT, "xml")])),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_lookup(lookup_in(&[(ENV_HISTORY_LIMIT, "-1")])),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"output_format": "json"}"#).unwrap();

        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }
}
