//! # Event
//!
//! The normalized description of one resource lifecycle transition.
//!
//! Events are produced upstream by the cluster watcher and handed to every
//! configured handler by reference. Handlers only ever read them.

use kube::core::DynamicObject;
use kube::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds whose resources live outside any namespace
const CLUSTER_SCOPED_KINDS: &[&str] = &[
    "namespace",
    "node",
    "cluster role",
    "clusterrole",
    "cluster role binding",
    "clusterrolebinding",
    "persistent volume",
    "persistentvolume",
];

/// Why an event was emitted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Reason {
    Created,
    Updated,
    Deleted,
    /// Any other upstream reason, kept verbatim
    Other(String),
}

impl Reason {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Reason::Created => "Created",
            Reason::Updated => "Updated",
            Reason::Deleted => "Deleted",
            Reason::Other(reason) => reason,
        }
    }

    /// Canonical verb for the transition
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Reason::Created => "create",
            Reason::Updated => "update",
            Reason::Deleted => "delete",
            Reason::Other(_) => "unknown",
        }
    }
}

impl Default for Reason {
    fn default() -> Self {
        Reason::Other(String::new())
    }
}

impl From<&str> for Reason {
    fn from(reason: &str) -> Self {
        match reason {
            "Created" => Reason::Created,
            "Updated" => Reason::Updated,
            "Deleted" => Reason::Deleted,
            other => Reason::Other(other.to_string()),
        }
    }
}

impl From<String> for Reason {
    fn from(reason: String) -> Self {
        Reason::from(reason.as_str())
    }
}

impl From<Reason> for String {
    fn from(reason: Reason) -> Self {
        match reason {
            Reason::Other(reason) => reason,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource lifecycle transition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub component: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub reason: Reason,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub name: String,
    /// Current representation of the resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obj: Option<DynamicObject>,
    /// Prior representation, only present for updates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_obj: Option<DynamicObject>,
}

impl Event {
    /// Build an event from a typed Kubernetes resource
    ///
    /// Kind, apiVersion, namespace and name come from the resource itself and
    /// the resource is attached as `obj`.
    pub fn from_resource<K>(resource: &K, reason: Reason) -> Result<Self, serde_json::Error>
    where
        K: Resource<DynamicType = ()> + Serialize,
    {
        let meta = resource.meta();
        Ok(Self {
            namespace: meta.namespace.clone().unwrap_or_default(),
            kind: K::kind(&()).into_owned(),
            api_version: K::api_version(&()).into_owned(),
            name: meta.name.clone().unwrap_or_default(),
            reason,
            obj: Some(to_dynamic(resource)?),
            ..Self::default()
        })
    }

    /// Attach the prior representation of an updated resource
    pub fn with_old_resource<K: Serialize>(mut self, old: &K) -> Result<Self, serde_json::Error> {
        self.old_obj = Some(to_dynamic(old)?);
        Ok(self)
    }

    /// Whether the resource lives outside any namespace
    #[must_use]
    pub fn is_cluster_scoped(&self) -> bool {
        self.namespace.is_empty()
            || CLUSTER_SCOPED_KINDS
                .iter()
                .any(|kind| kind.eq_ignore_ascii_case(&self.kind))
    }

    /// Human-readable summary of the transition
    #[must_use]
    pub fn message(&self) -> String {
        if self.is_cluster_scoped() {
            format!(
                "A `{}` `{}` has been `{}`",
                self.kind, self.name, self.reason
            )
        } else {
            format!(
                "A `{}` in namespace `{}` has been `{}`:\n`{}`",
                self.kind, self.namespace, self.reason, self.name
            )
        }
    }
}

fn to_dynamic<K: Serialize>(resource: &K) -> Result<DynamicObject, serde_json::Error> {
    serde_json::from_value(serde_json::to_value(resource)?)
}
