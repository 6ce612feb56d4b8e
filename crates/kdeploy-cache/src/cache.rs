//! Resource cache trait
//!
//! The ResourceCache hands out raw records, one list per kind.

use crate::selector::LabelSelector;
use async_trait::async_trait;
use kdeploy_types::ResourceKind;
use serde_json::Value;

/// Per-cycle view of the cluster
///
/// Fetch failures are the cache's concern: an implementation logs them and
/// returns an empty list, so consumers never branch on transport errors.
#[async_trait]
pub trait ResourceCache: Send + Sync {
    /// All records of `kind`, in the order the cluster returned them
    async fn get_all(&self, kind: ResourceKind) -> Vec<Value>;

    /// Records of `kind` whose labels satisfy `selector`
    async fn get_matching(&self, kind: ResourceKind, selector: &LabelSelector) -> Vec<Value> {
        self.get_all(kind)
            .await
            .into_iter()
            .filter(|record| selector.matches(record))
            .collect()
    }
}
