//! # Kubewatch
//!
//! Forwards normalized Kubernetes resource lifecycle events to notification
//! sinks, most notably AWS EventBridge.
//!
//! ## Overview
//!
//! 1. **Configuration** - Loads `~/.kubewatch.yaml` (or `--config` / `KW_CONFIG`)
//! 2. **Handler init** - Resolves sink settings once, warning about anything missing
//! 3. **Dispatch** - Every incoming event is handed to the handler concurrently
//! 4. **Observability** - Prometheus metrics and health probes while running
//!
//! See `kubewatch --help` for the command surface.

use anyhow::{Context, Result};
use clap::Parser;
use kubewatch::cli::{self, Cli};
use kubewatch::config::RuntimeConfig;
use kubewatch::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<()> {
    // Configure rustls crypto provider before any TLS connections are made
    // Ignore the error if a provider is already installed
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    let runtime = RuntimeConfig::from_env();

    logging::init_tracing(&runtime).context("Failed to initialize logging")?;
    metrics::register_metrics().context("Failed to register metrics")?;

    cli::execute(cli, &runtime, &mut std::io::stdout()).await
}
