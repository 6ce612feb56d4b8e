//! Node registry
//!
//! The node inventory for one cycle. Pods scheduled onto nodes that are no
//! longer listed are left out of the DaemonSet readiness cross-check.

use kdeploy_types::{decode, NodeManifest};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub name: String,
}

/// Nodes seen in the current cycle, in cache order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeRegistry {
    nodes: Vec<NodeRecord>,
}

impl NodeRegistry {
    /// Build from raw `Node` records.
    ///
    /// Every node is kept. Cordoned, tainted and unschedulable nodes are NOT
    /// filtered out; whether they should be is unresolved.
    pub fn from_records(records: &[Value]) -> Self {
        let nodes = records
            .iter()
            .filter_map(|record| match decode::<NodeManifest>(record) {
                Ok(node) => Some(NodeRecord {
                    name: node.metadata.name,
                }),
                Err(e) => {
                    warn!(error = %e, "Skipping undecodable node record");
                    None
                }
            })
            .collect();
        Self { nodes }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.iter()
    }
}
