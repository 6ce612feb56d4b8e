//! Object metadata shared by every kind

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Decode a raw cache record into one of the typed views.
pub fn decode<T: DeserializeOwned>(record: &serde_json::Value) -> Result<T, serde_json::Error> {
    T::deserialize(record)
}

/// Field deserializer treating an explicit `null` like an absent field.
///
/// A bare `status:` line in YAML decodes to `null`. Without this it would
/// fail the whole record instead of defaulting one block.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `metadata` block of a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: Option<String>,
    pub uid: Option<String>,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub generation: i64,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub labels: BTreeMap<String, String>,
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub owner_references: Vec<OwnerReference>,
}

impl ObjectMeta {
    /// Whether any owner reference points at `uid`
    pub fn is_owned_by(&self, uid: &str) -> bool {
        self.owner_references.iter().any(|r| r.uid == uid)
    }
}

/// Entry of `metadata.ownerReferences`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
    pub controller: Option<bool>,
}

/// Label selector as written in a workload spec
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSelectorSpec {
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub match_labels: BTreeMap<String, String>,
}
