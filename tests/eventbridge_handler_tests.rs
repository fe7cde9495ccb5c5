//! # EventBridge Handler Tests
//!
//! Drive the EventBridge handler through the `Handler` contract against a
//! recording bus and check what would have been sent to AWS.

mod common;

use common::{env, no_env, pod_created, Behavior, RecordingBus};
use kubewatch::config::Config;
use kubewatch::constants::{
    ENV_EVENTBRIDGE_CLUSTER_ARN, ENV_EVENTBRIDGE_ENDPOINT_ID, ENV_EVENTBRIDGE_EVENT_BUS_NAME,
};
use kubewatch::handler::eventbridge::{EntryDetail, EventBridge, EventBusClient};
use kubewatch::observability::metrics::handler_outcome_count;
use kubewatch::{DeliveryOutcome, Handler, Reason};
use std::sync::Arc;
use std::time::Duration;

fn config(endpoint_id: &str, cluster_arn: &str, event_bus_name: &str) -> Config {
    let mut config = Config::default();
    config.handler.eventbridge.endpoint_id = endpoint_id.to_string();
    config.handler.eventbridge.cluster_arn = cluster_arn.to_string();
    config.handler.eventbridge.event_bus_name = event_bus_name.to_string();
    config
}

async fn initialized(bus: &Arc<RecordingBus>, config: &Config) -> EventBridge {
    let mut handler = EventBridge::with_client(Arc::clone(bus) as Arc<dyn EventBusClient>)
        .with_env(Arc::new(no_env()));
    handler.init(config).await.unwrap();
    handler
}

#[tokio::test]
async fn test_pod_created_scenario() {
    let bus = Arc::new(RecordingBus::accepting());
    let handler = initialized(&bus, &config("", "arn:x", "")).await;

    handler.handle(&pod_created("default", "web-1")).await;

    let requests = bus.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.endpoint_id, None);
    assert_eq!(request.entries.len(), 1);

    let entry = &request.entries[0];
    assert_eq!(entry.source, "kubewatch/arn:x");
    assert_eq!(entry.detail_type, "Kubewatch Event");
    assert_eq!(entry.resources, vec!["arn:x".to_string()]);
    assert_eq!(entry.event_bus_name, None);

    let detail: serde_json::Value = serde_json::from_str(&entry.detail).unwrap();
    assert_eq!(detail["operation"], "create");
    assert_eq!(detail["clusterId"], "arn:x");
    assert_eq!(detail["namespace"], "default");
    assert_eq!(detail["kind"], "Pod");
    assert_eq!(detail["name"], "web-1");
    assert_eq!(detail["reason"], "Created");
    assert!(detail.get("host").is_none());
    assert!(detail.get("obj").is_none());
}

#[tokio::test]
async fn test_source_without_cluster_arn() {
    let bus = Arc::new(RecordingBus::accepting());
    let handler = initialized(&bus, &Config::default()).await;

    handler.handle(&pod_created("default", "web-1")).await;

    let entry = &bus.requests()[0].entries[0];
    assert_eq!(entry.source, "kubewatch");
    assert!(entry.resources.is_empty());
    let detail: EntryDetail = serde_json::from_str(&entry.detail).unwrap();
    assert!(detail.cluster_id.is_empty());
}

#[tokio::test]
async fn test_bus_and_endpoint_scoping() {
    let bus = Arc::new(RecordingBus::accepting());
    let handler = initialized(&bus, &config("abcde.veo", "arn:x", "ops-bus")).await;

    handler.handle(&pod_created("default", "web-1")).await;

    let request = &bus.requests()[0];
    assert_eq!(request.endpoint_id.as_deref(), Some("abcde.veo"));
    assert_eq!(request.entries[0].event_bus_name.as_deref(), Some("ops-bus"));
}

#[tokio::test]
async fn test_environment_fallback() {
    let bus = Arc::new(RecordingBus::accepting());
    let env = env(&[
        (ENV_EVENTBRIDGE_ENDPOINT_ID, "abcde.veo"),
        (ENV_EVENTBRIDGE_CLUSTER_ARN, "arn:env"),
        (ENV_EVENTBRIDGE_EVENT_BUS_NAME, "env-bus"),
    ]);
    let mut handler = EventBridge::with_client(Arc::clone(&bus) as Arc<dyn EventBusClient>)
        .with_env(Arc::new(env));
    handler.init(&config("", "arn:stored", "")).await.unwrap();

    let settings = handler.settings();
    assert_eq!(settings.endpoint_id, "abcde.veo");
    assert_eq!(settings.cluster_arn, "arn:stored");
    assert_eq!(settings.event_bus_name, "env-bus");
}

#[tokio::test]
async fn test_operation_mapping() {
    let bus = Arc::new(RecordingBus::accepting());
    let handler = initialized(&bus, &Config::default()).await;

    let reasons = [
        (Reason::Created, "create"),
        (Reason::Updated, "update"),
        (Reason::Deleted, "delete"),
        (Reason::Other("Synced".to_string()), "unknown"),
    ];
    for (reason, _) in &reasons {
        let mut event = pod_created("default", "web-1");
        event.reason = reason.clone();
        handler.handle(&event).await;
    }

    let operations: Vec<String> = bus
        .requests()
        .iter()
        .map(|r| {
            let detail: EntryDetail = serde_json::from_str(&r.entries[0].detail).unwrap();
            detail.operation
        })
        .collect();
    let expected: Vec<&str> = reasons.iter().map(|(_, op)| *op).collect();
    assert_eq!(operations, expected);
}

#[tokio::test]
async fn test_remote_error_is_dropped() {
    let bus = Arc::new(RecordingBus::new(Behavior::Fail("AccessDenied".to_string())));
    let handler = initialized(&bus, &Config::default()).await;

    assert_eq!(
        handler.send(&pod_created("default", "web-1")).await,
        DeliveryOutcome::RemoteError
    );
    // Not retried
    assert_eq!(bus.requests().len(), 1);
}

#[tokio::test]
async fn test_rejected_entry_is_counted() {
    let bus = Arc::new(RecordingBus::new(Behavior::Reject {
        code: "InternalFailure".to_string(),
        message: "try again".to_string(),
    }));
    let handler = initialized(&bus, &Config::default()).await;

    let before = handler_outcome_count("eventbridge", "rejected");
    handler.handle(&pod_created("default", "web-1")).await;
    assert!(handler_outcome_count("eventbridge", "rejected") > before);
}

#[tokio::test(start_paused = true)]
async fn test_put_events_times_out_after_five_seconds() {
    let bus = Arc::new(RecordingBus::new(Behavior::Hang(Duration::from_secs(60))));
    let handler = initialized(&bus, &Config::default()).await;

    let start = tokio::time::Instant::now();
    let outcome = handler.send(&pod_created("default", "web-1")).await;

    assert_eq!(outcome, DeliveryOutcome::Timeout);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(5), "gave up after {elapsed:?}");
    assert!(elapsed < Duration::from_secs(6), "gave up after {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_custom_timeout() {
    let bus = Arc::new(RecordingBus::new(Behavior::Hang(Duration::from_secs(60))));
    let mut handler = EventBridge::with_client(Arc::clone(&bus) as Arc<dyn EventBusClient>)
        .with_env(Arc::new(no_env()))
        .with_timeout(Duration::from_millis(250));
    handler.init(&Config::default()).await.unwrap();

    let start = tokio::time::Instant::now();
    assert_eq!(
        handler.send(&pod_created("default", "web-1")).await,
        DeliveryOutcome::Timeout
    );
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_concurrent_handles_share_one_client() {
    let bus = Arc::new(RecordingBus::accepting());
    let handler = Arc::new(initialized(&bus, &Config::default()).await);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                handler
                    .handle(&pod_created("default", &format!("web-{i}")))
                    .await;
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(bus.requests().len(), 16);
}
