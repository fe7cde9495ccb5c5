//! # Configuration
//!
//! The process-wide kubewatch configuration, loaded once at startup and
//! shared read-only with every handler.
//!
//! - [`Config`]: the YAML document (`handler`, `resource`, `namespace`)
//! - [`resolve`]: ordered precedence resolution (config, environment, default)
//! - [`overrides`]: flag overrides applied by the `eventbridge` command
//! - [`runtime`]: process-level settings read from the environment

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub mod overrides;
pub mod resolve;
pub mod runtime;

pub use overrides::EventBridgeOverrides;
pub use resolve::{resolve, EnvSource, ProcessEnv, Resolved, Source, Tier};
pub use runtime::RuntimeConfig;

/// Annotated sample configuration shipped with the binary
const SAMPLE_CONFIG: &str = include_str!("sample.yaml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_yaml::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Top-level kubewatch configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Per-sink settings
    #[serde(default)]
    pub handler: HandlerConfig,
    /// Resource kinds the upstream watcher should observe
    #[serde(default)]
    pub resource: BTreeMap<String, bool>,
    /// Namespace to watch, empty for all namespaces
    #[serde(default)]
    pub namespace: String,
}

/// Handler subsections, one per sink
///
/// Only `eventbridge` is interpreted here. Sections for the other sinks are
/// preserved untouched so that a config round trip never drops them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HandlerConfig {
    #[serde(default)]
    pub eventbridge: EventBridgeConfig,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

/// `handler.eventbridge`: all fields optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBridgeConfig {
    /// EventBridge global endpoint id
    #[serde(default)]
    pub endpoint_id: String,
    /// EKS cluster ARN, used for the entry `Source` and `Resources`
    #[serde(default)]
    pub cluster_arn: String,
    /// Target event bus name or ARN
    #[serde(default)]
    pub event_bus_name: String,
}

impl Config {
    /// Parse a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // An empty file is a valid, empty config
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).map_err(ConfigError::Parse)
    }

    /// Load the config at `path`; a missing file yields the default config
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_yaml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::Serialize)
    }

    /// The annotated sample configuration
    #[must_use]
    pub fn sample() -> &'static str {
        SAMPLE_CONFIG
    }
}

/// Locate the config file: explicit path, then `KW_CONFIG`, then `$HOME/.kubewatch.yaml`
pub fn config_path(explicit: Option<&Path>, env: &dyn EnvSource) -> PathBuf {
    use crate::constants::{DEFAULT_CONFIG_FILE_NAME, ENV_CONFIG_PATH};

    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = env.var(ENV_CONFIG_PATH).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    env.var("HOME")
        .map_or_else(PathBuf::new, PathBuf::from)
        .join(DEFAULT_CONFIG_FILE_NAME)
}
