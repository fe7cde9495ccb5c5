//! # Runtime Configuration
//!
//! Process-level settings loaded from environment variables.

use super::resolve::{EnvSource, ProcessEnv};
use crate::constants::DEFAULT_METRICS_PORT;

/// Process-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    /// Used when `RUST_LOG` is not set
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Serve `/metrics` and probes while running
    pub enable_metrics: bool,
    /// Port for the metrics and probe server
    pub metrics_port: u16,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
            log_format: "text".to_string(),
            enable_metrics: true,
            metrics_port: DEFAULT_METRICS_PORT,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(env: &dyn EnvSource) -> Self {
        let defaults = Self::default();
        Self {
            log_level: env_var_or_default_str(env, "LOG_LEVEL", &defaults.log_level),
            log_format: env_var_or_default_str(env, "LOG_FORMAT", &defaults.log_format),
            enable_metrics: env_var_or_default_bool(env, "ENABLE_METRICS", defaults.enable_metrics),
            metrics_port: env_var_or_default(env, "METRICS_PORT", defaults.metrics_port),
        }
    }

    #[must_use]
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(env: &dyn EnvSource, key: &str, default: T) -> T {
    env.var(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as boolean or return default
fn env_var_or_default_bool(env: &dyn EnvSource, key: &str, default: bool) -> bool {
    env.var(key)
        .map(|v| {
            let v_lower = v.to_lowercase();
            v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
        })
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(env: &dyn EnvSource, key: &str, default: &str) -> String {
    env.var(key).unwrap_or_else(|| default.to_string())
}
