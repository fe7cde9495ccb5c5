//! # EventBridge Handler
//!
//! Forwards events to AWS EventBridge as `Kubewatch Event` entries.
//!
//! This module provides functionality to:
//! - Resolve `endpointId`, `clusterArn` and `eventBusName` from config and environment
//! - Project events into a sparse JSON detail document
//! - Submit one single-entry `PutEvents` batch per event under a 5 second deadline
//! - Classify and count every delivery outcome
//!
//! Nothing is retried. An event that cannot be delivered is logged and dropped.

use crate::config::{Config, EnvSource, ProcessEnv};
use crate::constants::{DEFAULT_PUT_EVENTS_TIMEOUT_SECS, MAX_EVENTBRIDGE_ENTRY_BYTES};
use crate::event::Event;
use crate::handler::{DeliveryOutcome, Handler, HandlerError};
use crate::observability::metrics;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, Instrument};

pub mod client;
pub mod detail;
pub mod entry;
pub mod settings;

pub use client::{AwsEventBridgeClient, EventBusClient, PutEventsResult, ResultEntry, SubmitError};
pub use detail::EntryDetail;
pub use entry::{PutEventsEntry, PutEventsRequest};
pub use settings::{EventBridgeSettings, Field};

/// EventBridge handler
///
/// Settings and client are resolved once in `init` and never change
/// afterwards, so `handle` can run concurrently without locking.
pub struct EventBridge {
    settings: EventBridgeSettings,
    client: Option<Arc<dyn EventBusClient>>,
    env: Arc<dyn EnvSource + Send + Sync>,
    timeout: Duration,
}

impl std::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("settings", &self.settings)
            .field("client", &self.client)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for EventBridge {
    fn default() -> Self {
        Self {
            settings: EventBridgeSettings::default(),
            client: None,
            env: Arc::new(ProcessEnv),
            timeout: Duration::from_secs(DEFAULT_PUT_EVENTS_TIMEOUT_SECS),
        }
    }
}

impl EventBridge {
    /// Use `client` instead of loading the ambient AWS configuration in `init`
    #[must_use]
    pub fn with_client(client: Arc<dyn EventBusClient>) -> Self {
        Self {
            client: Some(client),
            ..Self::default()
        }
    }

    /// Read the `KW_EVENTBRIDGE_*` fallbacks from `env` instead of the process environment
    #[must_use]
    pub fn with_env(mut self, env: Arc<dyn EnvSource + Send + Sync>) -> Self {
        self.env = env;
        self
    }

    /// Deadline for each `PutEvents` round trip
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &EventBridgeSettings {
        &self.settings
    }

    /// Resolve settings from `config`, returning the fields left empty
    pub fn configure(&mut self, config: &Config) -> Vec<Field> {
        let (settings, missing) = EventBridgeSettings::resolve(config, self.env.as_ref());
        self.settings = settings;
        missing
    }

    /// Deliver one event and report what happened
    pub async fn send(&self, event: &Event) -> DeliveryOutcome {
        let span = info_span!(
            "eventbridge.put_events",
            event.kind = %event.kind,
            event.namespace = %event.namespace,
            event.name = %event.name,
        );
        self.send_inner(event).instrument(span).await
    }

    async fn send_inner(&self, event: &Event) -> DeliveryOutcome {
        let entry = match PutEventsEntry::build(event, &self.settings) {
            Ok(entry) => entry,
            Err(e) => {
                error!("Failed to marshal EventBridge entry detail: {}", e);
                return DeliveryOutcome::SerializationError;
            }
        };

        let size = entry.size();
        if size > MAX_EVENTBRIDGE_ENTRY_BYTES {
            error!(
                size,
                limit = MAX_EVENTBRIDGE_ENTRY_BYTES,
                "EventBridge entry exceeds the maximum entry size, dropping event"
            );
            return DeliveryOutcome::Oversized;
        }

        let Some(client) = &self.client else {
            error!("EventBridge handler used before init, dropping event");
            return DeliveryOutcome::Uninitialized;
        };

        let request = PutEventsRequest::single(entry, &self.settings);
        let start = Instant::now();
        let result = tokio::time::timeout(self.timeout, client.put_events(request)).await;
        metrics::observe_put_events_duration(start.elapsed().as_secs_f64());

        match result {
            Err(_) => {
                error!(
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Timed out sending event to EventBridge"
                );
                DeliveryOutcome::Timeout
            }
            Ok(Err(e)) => {
                error!("Failed to send event to EventBridge: {}", e);
                DeliveryOutcome::RemoteError
            }
            Ok(Ok(response)) => inspect_response(&response),
        }
    }
}

/// Classify an accepted `PutEvents` response
fn inspect_response(response: &PutEventsResult) -> DeliveryOutcome {
    if response.failed_entry_count > 0 {
        metrics::increment_eventbridge_failed_entries(i64::from(response.failed_entry_count));
        for entry in response.entries.iter().filter(|e| e.error_code.is_some()) {
            error!(
                error_code = entry.error_code.as_deref().unwrap_or_default(),
                error_message = entry.error_message.as_deref().unwrap_or_default(),
                "EventBridge rejected entry"
            );
        }
        return DeliveryOutcome::Rejected;
    }

    for event_id in response.entries.iter().filter_map(|e| e.event_id.as_deref()) {
        info!(event_id, "Sent event to EventBridge");
    }
    DeliveryOutcome::Delivered
}

#[async_trait]
impl Handler for EventBridge {
    fn name(&self) -> &'static str {
        "eventbridge"
    }

    async fn init(&mut self, config: &Config) -> Result<(), HandlerError> {
        let missing = self.configure(config);
        debug!(missing = missing.len(), "EventBridge settings resolved");

        if self.client.is_none() {
            let client = AwsEventBridgeClient::from_env().await?;
            self.client = Some(Arc::new(client));
        }
        Ok(())
    }

    async fn handle(&self, event: &Event) {
        let outcome = self.send(event).await;
        metrics::record_handler_outcome(self.name(), outcome.as_str());
    }
}
