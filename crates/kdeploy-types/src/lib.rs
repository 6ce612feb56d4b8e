//! kdeploy Types - Identities and raw record shapes
//!
//! The deploy tool reads cluster objects as loosely-typed JSON documents
//! (`serde_json::Value`) straight from the per-cycle cache. This crate holds
//! the typed views those documents are decoded into.
//!
//! ## Decoding Rules
//!
//! Every field is `#[serde(default)]`, so a record that omits a counter,
//! list or flag decodes with `0`, empty or `false` respectively. Only a
//! record whose fields have the wrong JSON type fails to decode.
//!
//! ## Key Types
//!
//! - **ResourceKind**: the kinds the rollout evaluator queries
//! - **ResourceIdentity**: kind + namespace + name of one object
//! - **DaemonSetManifest**, **PodManifest**, **NodeManifest**: typed views

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod daemon_set;
pub mod ids;
pub mod meta;
pub mod node;
pub mod pod;

// Re-export main types
pub use daemon_set::{DaemonSetManifest, DaemonSetSpec, DaemonSetStatus};
pub use ids::{ResourceIdentity, ResourceKind, Uid};
pub use meta::{decode, LabelSelectorSpec, ObjectMeta, OwnerReference};
pub use node::NodeManifest;
pub use pod::{
    ContainerSpec, ContainerState, ContainerStateTerminated, ContainerStateWaiting,
    ContainerStatus, PodCondition, PodManifest, PodSpec, PodStatus, Probe,
    TEMPLATE_GENERATION_LABEL,
};
