//! # EventBridge Settings
//!
//! Resolves `endpointId`, `clusterArn` and `eventBusName` once at init:
//! stored config first, then the `KW_EVENTBRIDGE_*` environment variables,
//! otherwise empty. Missing values are a supported, degraded state.

use crate::config::{resolve, Config, EnvSource, Source};
use crate::constants::{
    ENV_EVENTBRIDGE_CLUSTER_ARN, ENV_EVENTBRIDGE_ENDPOINT_ID, ENV_EVENTBRIDGE_EVENT_BUS_NAME,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static ENDPOINT_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9\-]+\.[A-Za-z0-9\-]+$")
        .expect("Failed to compile endpoint id pattern - this should never happen")
});

static CLUSTER_ARN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(arn:aws[\w-]*:eks:[a-z]{2}-[a-z]+-[\w-]+:[0-9]{12}:cluster/)?[0-9A-Za-z][A-Za-z0-9\-_]*$",
    )
    .expect("Failed to compile cluster ARN pattern - this should never happen")
});

static EVENT_BUS_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(arn:aws[\w-]*:events:[a-z]{2}-[a-z]+-[\w-]+:[0-9]{12}:event-bus/)?[\.\-_A-Za-z0-9]+$",
    )
    .expect("Failed to compile event bus name pattern - this should never happen")
});

/// One of the three EventBridge settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    EndpointId,
    ClusterArn,
    EventBusName,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::EndpointId, Field::ClusterArn, Field::EventBusName];

    /// Key under `handler.eventbridge`
    #[must_use]
    pub fn config_key(&self) -> &'static str {
        match self {
            Field::EndpointId => "endpointId",
            Field::ClusterArn => "clusterArn",
            Field::EventBusName => "eventBusName",
        }
    }

    #[must_use]
    pub fn env_var(&self) -> &'static str {
        match self {
            Field::EndpointId => ENV_EVENTBRIDGE_ENDPOINT_ID,
            Field::ClusterArn => ENV_EVENTBRIDGE_CLUSTER_ARN,
            Field::EventBusName => ENV_EVENTBRIDGE_EVENT_BUS_NAME,
        }
    }

    /// Flag of the `kubewatch eventbridge` command
    #[must_use]
    pub fn flag(&self) -> &'static str {
        match self {
            Field::EndpointId => "--endpointid/-e",
            Field::ClusterArn => "--clusterArn/-c",
            Field::EventBusName => "--eventBusName/-b",
        }
    }

    /// What happens while the field is missing
    #[must_use]
    pub fn consequence(&self) -> &'static str {
        match self {
            Field::EndpointId => "Missing EventBridge endpointId, using default endpoint.",
            Field::ClusterArn => "Missing EKS Cluster ARN. Events will not include cluster information.",
            Field::EventBusName => "Missing EventBridge event bus name, using default event bus.",
        }
    }

    fn stored<'a>(&self, config: &'a Config) -> &'a str {
        let eb = &config.handler.eventbridge;
        match self {
            Field::EndpointId => &eb.endpoint_id,
            Field::ClusterArn => &eb.cluster_arn,
            Field::EventBusName => &eb.event_bus_name,
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Field::EndpointId => &*ENDPOINT_ID_PATTERN,
            Field::ClusterArn => &*CLUSTER_ARN_PATTERN,
            Field::EventBusName => &*EVENT_BUS_NAME_PATTERN,
        }
    }

    /// Whether `value` matches the format AWS documents for this field
    #[must_use]
    pub fn is_well_formed(&self, value: &str) -> bool {
        self.pattern().is_match(value)
    }
}

/// Resolved EventBridge settings, frozen after init
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBridgeSettings {
    pub endpoint_id: String,
    pub cluster_arn: String,
    pub event_bus_name: String,
}

impl EventBridgeSettings {
    /// Resolve every field, logging a warning for each one left empty
    ///
    /// Returns the settings and the fields that ended up missing.
    pub fn resolve(config: &Config, env: &dyn EnvSource) -> (Self, Vec<Field>) {
        let mut settings = Self::default();
        let mut missing = Vec::new();

        for field in Field::ALL {
            let resolved = resolve(
                &[Source::Config(field.stored(config)), Source::Env(field.env_var())],
                env,
            );

            if resolved.is_empty() {
                warn!(
                    field = field.config_key(),
                    "{} Set it with the {} flag or the {} environment variable.",
                    field.consequence(),
                    field.flag(),
                    field.env_var()
                );
                missing.push(field);
                continue;
            }

            debug!(
                field = field.config_key(),
                source = resolved.tier.as_str(),
                "Resolved EventBridge setting"
            );
            if !field.is_well_formed(&resolved.value) {
                warn!(
                    field = field.config_key(),
                    value = %resolved.value,
                    "EventBridge {} does not look valid, requests may be rejected",
                    field.config_key()
                );
            }
            *settings.field_mut(field) = resolved.value;
        }

        (settings, missing)
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::EndpointId => &mut self.endpoint_id,
            Field::ClusterArn => &mut self.cluster_arn,
            Field::EventBusName => &mut self.event_bus_name,
        }
    }
}
