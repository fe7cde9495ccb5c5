//! # Entry Detail
//!
//! The JSON document sent as the `Detail` of every EventBridge entry.
//! Empty fields are left out of the encoded form.

use crate::event::Event;
use kube::core::DynamicObject;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetail {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Canonical verb: create, update, delete or unknown
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub operation: String,
    /// EKS cluster ARN the event originates from
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub component: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obj: Option<DynamicObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_obj: Option<DynamicObject>,
}

impl EntryDetail {
    /// Project an event, tagging it with the cluster it came from
    #[must_use]
    pub fn project(event: &Event, cluster_arn: &str) -> Self {
        Self {
            message: event.message(),
            operation: event.reason.operation().to_string(),
            cluster_id: cluster_arn.to_string(),
            namespace: event.namespace.clone(),
            kind: event.kind.clone(),
            api_version: event.api_version.clone(),
            component: event.component.clone(),
            host: event.host.clone(),
            reason: event.reason.to_string(),
            status: event.status.clone(),
            name: event.name.clone(),
            obj: event.obj.clone(),
            old_obj: event.old_obj.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Reason;
    use serde_json::Value;

    #[test]
    fn test_sparse_round_trip() {
        let detail = EntryDetail {
            message: "hello".to_string(),
            kind: "Pod".to_string(),
            ..Default::default()
        };
        let parsed: Value = serde_json::from_str(&detail.to_json().unwrap()).unwrap();
        let object = parsed.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["message"], "hello");
        assert_eq!(object["kind"], "Pod");
    }

    #[test]
    fn test_project_copies_fields() {
        let event = Event {
            namespace: "default".to_string(),
            kind: "Deployment".to_string(),
            api_version: "apps/v1".to_string(),
            component: "kube-controller-manager".to_string(),
            host: "node-1".to_string(),
            reason: Reason::Updated,
            status: "Normal".to_string(),
            name: "api".to_string(),
            ..Default::default()
        };
        let detail = EntryDetail::project(&event, "arn:x");
        assert_eq!(detail.operation, "update");
        assert_eq!(detail.reason, "Updated");
        assert_eq!(detail.cluster_id, "arn:x");
        assert_eq!(detail.api_version, "apps/v1");
        assert_eq!(detail.message, event.message());

        let parsed: Value = serde_json::from_str(&detail.to_json().unwrap()).unwrap();
        assert_eq!(parsed["apiVersion"], "apps/v1");
        assert_eq!(parsed["clusterId"], "arn:x");
        assert!(parsed.get("obj").is_none());
        assert!(parsed.get("oldObj").is_none());
    }

    #[test]
    fn test_unknown_reason_maps_to_unknown_operation() {
        let event = Event {
            reason: Reason::from("BackOff"),
            ..Default::default()
        };
        let detail = EntryDetail::project(&event, "");
        assert_eq!(detail.operation, "unknown");
        assert_eq!(detail.reason, "BackOff");
        let parsed: Value = serde_json::from_str(&detail.to_json().unwrap()).unwrap();
        assert!(parsed.get("clusterId").is_none());
    }
}
