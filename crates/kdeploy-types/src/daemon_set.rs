//! DaemonSet record shape

use crate::meta::{LabelSelectorSpec, ObjectMeta};
use serde::{Deserialize, Serialize};

/// Typed view of a `DaemonSet` record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DaemonSetManifest {
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub metadata: ObjectMeta,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub spec: DaemonSetSpec,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub status: DaemonSetStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DaemonSetSpec {
    /// Pod template revision; pods carry it as the
    /// `pod-template-generation` label
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub template_generation: i64,

    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub selector: LabelSelectorSpec,
}

/// Controller-reported rollout counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DaemonSetStatus {
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub observed_generation: i64,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub current_number_scheduled: i64,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub desired_number_scheduled: i64,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub updated_number_scheduled: i64,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub number_ready: i64,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub number_available: i64,
}
