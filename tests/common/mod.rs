//! Common test utilities for kubewatch integration tests
//!
//! Provides an in-memory [`EventBusClient`] that records every request and
//! answers with a scripted behavior, plus small event builders.

#![allow(dead_code, reason = "Not every test binary uses every helper")]

use async_trait::async_trait;
use kubewatch::handler::eventbridge::{
    EventBusClient, PutEventsRequest, PutEventsResult, ResultEntry, SubmitError,
};
use kubewatch::{Event, Reason};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// How the fake bus answers
#[derive(Debug, Clone)]
pub enum Behavior {
    Accept,
    Fail(String),
    Reject { code: String, message: String },
    Hang(Duration),
}

#[derive(Debug)]
pub struct RecordingBus {
    behavior: Behavior,
    requests: Mutex<Vec<PutEventsRequest>>,
}

impl RecordingBus {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new(Behavior::Accept)
    }

    pub fn requests(&self) -> Vec<PutEventsRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventBusClient for RecordingBus {
    async fn put_events(&self, request: PutEventsRequest) -> Result<PutEventsResult, SubmitError> {
        let count = request.entries.len();
        self.requests.lock().unwrap().push(request);

        match &self.behavior {
            Behavior::Accept => Ok(PutEventsResult {
                failed_entry_count: 0,
                entries: (0..count)
                    .map(|i| ResultEntry {
                        event_id: Some(format!("event-{i}")),
                        ..Default::default()
                    })
                    .collect(),
            }),
            Behavior::Fail(reason) => Err(SubmitError::Service(reason.clone())),
            Behavior::Reject { code, message } => Ok(PutEventsResult {
                failed_entry_count: i32::try_from(count).unwrap(),
                entries: (0..count)
                    .map(|_| ResultEntry {
                        event_id: None,
                        error_code: Some(code.clone()),
                        error_message: Some(message.clone()),
                    })
                    .collect(),
            }),
            Behavior::Hang(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(PutEventsResult::default())
            }
        }
    }
}

/// An empty environment, so tests never see the real `KW_EVENTBRIDGE_*`
pub fn no_env() -> HashMap<String, String> {
    HashMap::new()
}

pub fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub fn pod_created(namespace: &str, name: &str) -> Event {
    Event {
        namespace: namespace.to_string(),
        kind: "Pod".to_string(),
        api_version: "v1".to_string(),
        name: name.to_string(),
        reason: Reason::Created,
        ..Default::default()
    }
}
