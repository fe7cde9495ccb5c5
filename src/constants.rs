//! # Constants
//!
//! Shared constants used throughout kubewatch.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Service name used as the EventBridge `Source` prefix
pub const SERVICE_NAME: &str = "kubewatch";

/// EventBridge `DetailType` for every entry kubewatch emits
pub const EVENTBRIDGE_DETAIL_TYPE: &str = "Kubewatch Event";

/// Environment variable fallback for `handler.eventbridge.endpointId`
pub const ENV_EVENTBRIDGE_ENDPOINT_ID: &str = "KW_EVENTBRIDGE_ENDPOINT_ID";

/// Environment variable fallback for `handler.eventbridge.clusterArn`
pub const ENV_EVENTBRIDGE_CLUSTER_ARN: &str = "KW_EVENTBRIDGE_CLUSTER_ARN";

/// Environment variable fallback for `handler.eventbridge.eventBusName`
pub const ENV_EVENTBRIDGE_EVENT_BUS_NAME: &str = "KW_EVENTBRIDGE_EVENT_BUS_NAME";

/// Deadline for a single `PutEvents` round trip (seconds)
pub const DEFAULT_PUT_EVENTS_TIMEOUT_SECS: u64 = 5;

/// Maximum size of a single `PutEvents` entry as documented by AWS (256 KiB)
pub const MAX_EVENTBRIDGE_ENTRY_BYTES: usize = 256 * 1024;

/// Environment variable pointing at the config file
pub const ENV_CONFIG_PATH: &str = "KW_CONFIG";

/// Config file name looked up in `$HOME` when no path is given
pub const DEFAULT_CONFIG_FILE_NAME: &str = ".kubewatch.yaml";

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Capacity of the channel between the event reader and the dispatcher
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;
