//! # Logging
//!
//! Installs the global tracing subscriber. `RUST_LOG` wins when set,
//! otherwise `LOG_LEVEL` applies to the kubewatch crate. Logs go to stderr
//! so command output on stdout stays clean.

use crate::config::RuntimeConfig;
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn init_tracing(config: &RuntimeConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(&config.log_level)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = if config.json_logs() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow!("Failed to initialize tracing subscriber: {e}"))
}

fn default_directive(level: &str) -> String {
    format!("kubewatch={}", level.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive("INFO"), "kubewatch=info");
        assert_eq!(default_directive("Debug"), "kubewatch=debug");
    }
}
