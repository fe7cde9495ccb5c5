//! # Kubewatch CLI
//!
//! Command-line interface of the `kubewatch` binary.
//!
//! ## Usage
//!
//! ```bash
//! # Store EventBridge settings (prints the updated config)
//! kubewatch eventbridge -c arn:aws:eks:us-east-1:123456789012:cluster/prod > ~/.kubewatch.yaml
//!
//! # Dispatch newline-delimited JSON events from stdin
//! kubewatch run --handler eventbridge < events.ndjson
//!
//! # Inspect configuration
//! kubewatch config sample
//! kubewatch config view
//! ```

use crate::config::{config_path, Config, EventBridgeOverrides, ProcessEnv, RuntimeConfig};
use crate::constants::{DEFAULT_EVENT_CHANNEL_CAPACITY, SERVICE_NAME};
use crate::dispatcher::Dispatcher;
use crate::handler::{self, HandlerKind};
use crate::server::{start_server, ServerState};
use crate::source::{forward_events, ReadStats};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Kubernetes lifecycle notifications
#[derive(Debug, Parser)]
#[command(name = "kubewatch")]
#[command(
    about = "Forward Kubernetes resource lifecycle events to notification sinks",
    long_about = None,
    after_help = "\
Configuration file lookup: --config, then KW_CONFIG, then $HOME/.kubewatch.yaml

Examples:
  kubewatch eventbridge -e abcde.veo -b ops-bus
  kubewatch run --handler eventbridge --events events.ndjson
"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Dispatch events to a handler until the input ends
    Run {
        /// Handler that receives every event
        #[arg(long, value_enum, default_value = "default")]
        handler: HandlerKind,

        /// Newline-delimited JSON events, `-` or absent for stdin
        #[arg(long)]
        events: Option<PathBuf>,
    },

    /// Set EventBridge handler settings and print the updated configuration
    Eventbridge {
        /// EventBridge global endpoint id
        #[arg(short = 'e', long = "endpointid")]
        endpoint_id: Option<String>,

        /// EKS cluster ARN
        #[arg(short = 'c', long = "clusterArn")]
        cluster_arn: Option<String>,

        /// Event bus name or ARN
        #[arg(short = 'b', long = "eventBusName")]
        event_bus_name: Option<String>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print version and build information
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the annotated sample configuration
    Sample,
    /// Print the configuration currently in effect
    View,
}

/// Execute `cli`, writing command output to `out`
pub async fn execute(cli: Cli, runtime: &RuntimeConfig, out: &mut dyn Write) -> Result<()> {
    let path = config_path(cli.config.as_deref(), &ProcessEnv);

    match cli.command {
        Commands::Run { handler, events } => run(&path, handler, events.as_deref(), runtime).await,
        Commands::Eventbridge {
            endpoint_id,
            cluster_arn,
            event_bus_name,
        } => {
            let overrides = EventBridgeOverrides {
                endpoint_id,
                cluster_arn,
                event_bus_name,
            };
            let config = load(&path)?;
            let yaml = configure_eventbridge(config, &overrides)?;
            out.write_all(yaml.as_bytes())?;
            Ok(())
        }
        Commands::Config { action } => {
            let text = match action {
                ConfigAction::Sample => Config::sample().to_string(),
                ConfigAction::View => load(&path)?.to_yaml()?,
            };
            out.write_all(text.as_bytes())?;
            Ok(())
        }
        Commands::Version => {
            writeln!(out, "{}", version_string())?;
            Ok(())
        }
    }
}

fn load(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Apply `overrides` to `config` and render the result
pub fn configure_eventbridge(mut config: Config, overrides: &EventBridgeOverrides) -> Result<String> {
    let changed = overrides.apply(&mut config);
    if changed == 0 {
        warn!("No EventBridge settings changed");
    } else {
        info!(changed, "Updated EventBridge settings");
    }
    Ok(config.to_yaml()?)
}

#[must_use]
pub fn version_string() -> String {
    format!(
        "{} {} (git {}, built {})",
        SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_GIT_HASH"),
        env!("BUILD_DATETIME")
    )
}

async fn run(
    config_path: &Path,
    kind: HandlerKind,
    events: Option<&Path>,
    runtime: &RuntimeConfig,
) -> Result<()> {
    info!("Starting {} {}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    let config = load(config_path)?;

    let server_state = Arc::new(ServerState::default());
    if runtime.enable_metrics {
        let state = Arc::clone(&server_state);
        let port = runtime.metrics_port;
        tokio::spawn(async move {
            if let Err(e) = start_server(port, state).await {
                error!("HTTP server error: {}", e);
            }
        });
    }

    let handler = handler::build(kind, &config)
        .await
        .context("Failed to initialize handler")?;
    let dispatcher = Dispatcher::new(vec![handler]);
    info!(handlers = ?dispatcher.handler_names(), "Dispatching events");
    server_state.mark_ready();

    let reader = open_events(events).await?;
    tokio::select! {
        result = pump(&dispatcher, reader) => {
            let (stats, dispatched) = result?;
            info!(
                dispatched,
                malformed = stats.malformed,
                "Finished dispatching events"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping");
        }
    }
    Ok(())
}

async fn open_events(path: Option<&Path>) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open events file {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}

/// Feed every event from `reader` through `dispatcher`
///
/// Returns the reader statistics and the number of events dispatched.
pub async fn pump<R>(dispatcher: &Dispatcher, reader: R) -> Result<(ReadStats, usize)>
where
    R: AsyncBufRead + Unpin,
{
    let (tx, rx) = mpsc::channel(DEFAULT_EVENT_CHANNEL_CAPACITY);
    let (stats, dispatched) = tokio::join!(forward_events(reader, tx), dispatcher.run(rx));
    Ok((stats?, dispatched))
}
