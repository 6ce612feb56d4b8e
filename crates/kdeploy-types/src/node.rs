//! Node record shape

use crate::meta::ObjectMeta;
use serde::{Deserialize, Serialize};

/// Typed view of a `Node` record. Only the identity is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeManifest {
    #[serde(deserialize_with = "crate::meta::null_as_default")]
    pub metadata: ObjectMeta,
}
