//! Strongly-typed identifiers for cluster resources

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource kinds the rollout evaluator reads from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    DaemonSet,
    Pod,
    Node,
}

impl ResourceKind {
    /// The `kind` field value used by the cluster API
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::DaemonSet => "DaemonSet",
            ResourceKind::Pod => "Pod",
            ResourceKind::Node => "Node",
        }
    }

    /// Parse a `kind` field value; unknown kinds yield `None`
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "DaemonSet" => Some(ResourceKind::DaemonSet),
            "Pod" => Some(ResourceKind::Pod),
            "Node" => Some(ResourceKind::Node),
            _ => None,
        }
    }

    /// Whether objects of this kind live inside a namespace
    pub fn is_namespaced(&self) -> bool {
        !matches!(self, ResourceKind::Node)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one object: kind, namespace and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentity {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
}

impl ResourceIdentity {
    pub fn new(kind: ResourceKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn daemon_set(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ResourceKind::DaemonSet, namespace, name)
    }

    pub fn pod(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ResourceKind::Pod, namespace, name)
    }

    /// Whether a record with the given metadata names this object.
    ///
    /// A record without a namespace matches any namespace, which is what
    /// hand-written manifest files usually look like.
    pub fn matches(&self, name: &str, namespace: Option<&str>) -> bool {
        if self.name != name {
            return false;
        }
        match namespace {
            Some(ns) if self.kind.is_namespaced() => ns == self.namespace,
            _ => true,
        }
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// Object uid assigned by the API server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uid(String);

impl Uid {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_api_name() {
        for kind in [ResourceKind::DaemonSet, ResourceKind::Pod, ResourceKind::Node] {
            assert_eq!(ResourceKind::from_kind(kind.as_str()), Some(kind));
        }
        assert_eq!(ResourceKind::from_kind("Deployment"), None);
    }

    #[test]
    fn test_identity_matching() {
        let id = ResourceIdentity::daemon_set("test", "ds-app");
        assert!(id.matches("ds-app", Some("test")));
        assert!(id.matches("ds-app", None));
        assert!(!id.matches("ds-app", Some("other")));
        assert!(!id.matches("ds-other", Some("test")));
    }

    #[test]
    fn test_identity_display() {
        let id = ResourceIdentity::pod("test", "ds-app-abc12");
        assert_eq!(id.to_string(), "Pod/ds-app-abc12");
    }
}
