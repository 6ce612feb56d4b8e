//! Pod record shape

use crate::meta::ObjectMeta;
use serde::{Deserialize, Serialize};

/// Label a DaemonSet controller stamps on every pod it creates
pub const TEMPLATE_GENERATION_LABEL: &str = "pod-template-generation";

/// Typed view of a `Pod` record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodManifest {
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub metadata: ObjectMeta,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub spec: PodSpec,
    pub status: Option<PodStatus>,
}

impl PodManifest {
    /// Template generation the pod was created from.
    ///
    /// A missing or non-numeric label yields `None`.
    pub fn template_generation(&self) -> Option<i64> {
        self.metadata
            .labels
            .get(TEMPLATE_GENERATION_LABEL)
            .and_then(|v| v.trim().parse().ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodSpec {
    pub node_name: Option<String>,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub containers: Vec<ContainerSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub readiness_probe: Option<Probe>,
}

/// Readiness probe; only the parts used in timeout messages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Probe {
    pub http_get: Option<HttpGetAction>,
    pub exec: Option<ExecAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpGetAction {
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecAction {
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodStatus {
    pub phase: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub conditions: Vec<PodCondition>,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub container_statuses: Vec<ContainerStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    pub reason: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerStatus {
    pub name: String,
    pub image: String,
    pub ready: bool,
    pub restart_count: i64,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub state: ContainerState,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub last_state: ContainerState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerState {
    pub waiting: Option<ContainerStateWaiting>,
    pub terminated: Option<ContainerStateTerminated>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerStateWaiting {
    pub reason: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerStateTerminated {
    pub reason: Option<String>,
    pub message: Option<String>,
    pub exit_code: Option<i32>,
}
