//! # Handlers
//!
//! Notification sinks. Every sink implements [`Handler`]: it is initialized
//! once from the process-wide [`Config`] and then receives events one at a
//! time.
//!
//! `handle` has no return value. Delivery is best-effort: a failure is
//! logged and counted under `kubewatch_handler_events_total` with its
//! [`DeliveryOutcome`], and never reaches the caller.

use crate::config::Config;
use crate::event::Event;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub mod eventbridge;
pub mod log;

pub use eventbridge::EventBridge;
pub use log::LogHandler;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// The sink's ambient service configuration cannot be used
    #[error("{handler}: service configuration unavailable: {reason}")]
    ServiceConfig {
        handler: &'static str,
        reason: String,
    },
}

/// Notification sink contract
///
/// `init` is called once before any event is handled. After it returns,
/// `handle` may be invoked repeatedly and concurrently; implementations must
/// bound each call with their own timeout.
#[async_trait]
pub trait Handler: Send + Sync + std::fmt::Debug {
    /// Short name used in logs and metric labels
    fn name(&self) -> &'static str;

    async fn init(&mut self, config: &Config) -> Result<(), HandlerError>;

    async fn handle(&self, event: &Event);
}

/// What happened to one event in one handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryOutcome {
    /// Accepted by the sink
    Delivered,
    /// The payload could not be encoded
    SerializationError,
    /// The payload exceeds the sink's size limit
    Oversized,
    /// The request failed
    RemoteError,
    /// The request did not complete within the deadline
    Timeout,
    /// The request succeeded but the sink refused the entry
    Rejected,
    /// `handle` was called on a handler that was never initialized
    Uninitialized,
}

impl DeliveryOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryOutcome::Delivered => "delivered",
            DeliveryOutcome::SerializationError => "serialization_error",
            DeliveryOutcome::Oversized => "oversized",
            DeliveryOutcome::RemoteError => "remote_error",
            DeliveryOutcome::Timeout => "timeout",
            DeliveryOutcome::Rejected => "rejected",
            DeliveryOutcome::Uninitialized => "uninitialized",
        }
    }
}

/// Selectable handler implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HandlerKind {
    /// Log every event
    Default,
    /// Forward events to AWS EventBridge
    Eventbridge,
}

/// Construct and initialize the handler for `kind`
pub async fn build(kind: HandlerKind, config: &Config) -> Result<Arc<dyn Handler>, HandlerError> {
    match kind {
        HandlerKind::Default => initialized(LogHandler::default(), config).await,
        HandlerKind::Eventbridge => initialized(EventBridge::default(), config).await,
    }
}

async fn initialized<H: Handler + 'static>(
    mut handler: H,
    config: &Config,
) -> Result<Arc<dyn Handler>, HandlerError> {
    handler.init(config).await?;
    tracing::info!("Initialized {} handler", handler.name());
    Ok(Arc::new(handler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels_are_distinct() {
        let outcomes = [
            DeliveryOutcome::Delivered,
            DeliveryOutcome::SerializationError,
            DeliveryOutcome::Oversized,
            DeliveryOutcome::RemoteError,
            DeliveryOutcome::Timeout,
            DeliveryOutcome::Rejected,
            DeliveryOutcome::Uninitialized,
        ];
        let labels: std::collections::HashSet<_> = outcomes.iter().map(DeliveryOutcome::as_str).collect();
        assert_eq!(labels.len(), outcomes.len());
    }

    #[tokio::test]
    async fn test_build_default_handler() {
        let handler = build(HandlerKind::Default, &Config::default()).await.unwrap();
        assert_eq!(handler.name(), "default");
    }
}
