//! # EventBridge Client
//!
//! The network seam of the EventBridge handler. [`EventBusClient`] is
//! implemented by [`AwsEventBridgeClient`] against the AWS SDK, and by
//! in-memory fakes in tests.

use super::entry::{PutEventsEntry, PutEventsRequest};
use crate::handler::HandlerError;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_eventbridge::error::DisplayErrorContext;
use aws_sdk_eventbridge::types::PutEventsRequestEntry;
use aws_sdk_eventbridge::Client as EventBridgeClient;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("PutEvents request failed: {0}")]
    Service(String),
}

/// Per-entry result returned by `PutEvents`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultEntry {
    pub event_id: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

/// Response of an accepted `PutEvents` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutEventsResult {
    /// Number of entries EventBridge refused
    pub failed_entry_count: i32,
    /// One result per submitted entry, in submission order
    pub entries: Vec<ResultEntry>,
}

#[async_trait]
pub trait EventBusClient: Send + Sync + std::fmt::Debug {
    async fn put_events(&self, request: PutEventsRequest) -> Result<PutEventsResult, SubmitError>;
}

/// AWS SDK backed client
#[derive(Clone)]
pub struct AwsEventBridgeClient {
    client: EventBridgeClient,
    region: String,
}

impl std::fmt::Debug for AwsEventBridgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsEventBridgeClient")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl AwsEventBridgeClient {
    /// Create a client from the ambient AWS configuration
    ///
    /// Uses the default credential chain (environment, profile, IRSA, instance
    /// metadata). Fails when no region can be determined, since every request
    /// would fail without one.
    pub async fn from_env() -> Result<Self, HandlerError> {
        info!("Loading AWS config");
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        Self::new(&sdk_config)
    }

    pub fn new(sdk_config: &SdkConfig) -> Result<Self, HandlerError> {
        let region = sdk_config
            .region()
            .map(ToString::to_string)
            .ok_or_else(|| HandlerError::ServiceConfig {
                handler: "eventbridge",
                reason: "no AWS region configured (set AWS_REGION or a profile region)"
                    .to_string(),
            })?;

        info!(region = %region, "EventBridge client ready");
        Ok(Self {
            client: EventBridgeClient::new(sdk_config),
            region,
        })
    }
}

#[async_trait]
impl EventBusClient for AwsEventBridgeClient {
    async fn put_events(&self, request: PutEventsRequest) -> Result<PutEventsResult, SubmitError> {
        let entries = request.entries.into_iter().map(to_sdk_entry).collect();

        let output = self
            .client
            .put_events()
            .set_entries(Some(entries))
            .set_endpoint_id(request.endpoint_id)
            .send()
            .await
            .map_err(|e| SubmitError::Service(DisplayErrorContext(&e).to_string()))?;

        Ok(PutEventsResult {
            failed_entry_count: output.failed_entry_count(),
            entries: output
                .entries()
                .iter()
                .map(|entry| ResultEntry {
                    event_id: entry.event_id().map(ToString::to_string),
                    error_code: entry.error_code().map(ToString::to_string),
                    error_message: entry.error_message().map(ToString::to_string),
                })
                .collect(),
        })
    }
}

fn to_sdk_entry(entry: PutEventsEntry) -> PutEventsRequestEntry {
    let resources = (!entry.resources.is_empty()).then_some(entry.resources);
    PutEventsRequestEntry::builder()
        .source(entry.source)
        .detail_type(entry.detail_type)
        .detail(entry.detail)
        .set_resources(resources)
        .set_event_bus_name(entry.event_bus_name)
        .build()
}
