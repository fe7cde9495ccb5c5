//! # PutEvents Entry
//!
//! Builds the per-event request submitted to EventBridge.

use super::detail::EntryDetail;
use super::settings::EventBridgeSettings;
use crate::constants::{EVENTBRIDGE_DETAIL_TYPE, SERVICE_NAME};
use crate::event::Event;

/// One entry of a `PutEvents` batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutEventsEntry {
    pub source: String,
    pub detail_type: String,
    pub resources: Vec<String>,
    /// JSON-encoded [`EntryDetail`]
    pub detail: String,
    /// Omitted when empty so the default bus is used
    pub event_bus_name: Option<String>,
}

impl PutEventsEntry {
    /// Build the entry for `event`
    pub fn build(event: &Event, settings: &EventBridgeSettings) -> Result<Self, serde_json::Error> {
        let detail = EntryDetail::project(event, &settings.cluster_arn).to_json()?;

        let source = if settings.cluster_arn.is_empty() {
            SERVICE_NAME.to_string()
        } else {
            format!("{SERVICE_NAME}/{}", settings.cluster_arn)
        };

        let resources = if settings.cluster_arn.is_empty() {
            Vec::new()
        } else {
            vec![settings.cluster_arn.clone()]
        };

        Ok(Self {
            source,
            detail_type: EVENTBRIDGE_DETAIL_TYPE.to_string(),
            resources,
            detail,
            event_bus_name: non_empty(&settings.event_bus_name),
        })
    }

    /// Entry size as EventBridge accounts for it
    ///
    /// UTF-8 bytes of `Source`, `DetailType`, `Detail` and each `Resources`
    /// item. No `Time` is sent so it contributes nothing.
    #[must_use]
    pub fn size(&self) -> usize {
        self.source.len()
            + self.detail_type.len()
            + self.detail.len()
            + self.resources.iter().map(String::len).sum::<usize>()
    }
}

/// A `PutEvents` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutEventsRequest {
    pub entries: Vec<PutEventsEntry>,
    /// Global endpoint to scope the call to
    pub endpoint_id: Option<String>,
}

impl PutEventsRequest {
    #[must_use]
    pub fn single(entry: PutEventsEntry, settings: &EventBridgeSettings) -> Self {
        Self {
            entries: vec![entry],
            endpoint_id: non_empty(&settings.endpoint_id),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
