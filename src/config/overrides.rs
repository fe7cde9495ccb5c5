//! # EventBridge Flag Overrides
//!
//! Values passed to `kubewatch eventbridge` replace stored config fields.
//! A flag that is absent or empty never clears a stored value.

use super::Config;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBridgeOverrides {
    pub endpoint_id: Option<String>,
    pub cluster_arn: Option<String>,
    pub event_bus_name: Option<String>,
}

impl EventBridgeOverrides {
    /// Apply the overrides, returning how many fields changed
    pub fn apply(&self, config: &mut Config) -> usize {
        let eb = &mut config.handler.eventbridge;
        [
            (&mut eb.endpoint_id, &self.endpoint_id),
            (&mut eb.cluster_arn, &self.cluster_arn),
            (&mut eb.event_bus_name, &self.event_bus_name),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            let value = value.as_deref().filter(|v| !v.is_empty())?;
            if field.as_str() == value {
                return None;
            }
            *field = value.to_string();
            Some(())
        })
        .count()
    }
}
