//! In-memory resource cache
//!
//! Suitable for tests and for evaluating a rollout against a saved snapshot
//! of the cluster (`kubectl get -o yaml` output).

use crate::cache::ResourceCache;
use crate::error::{CacheError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use kdeploy_types::ResourceKind;
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// DashMap-backed cache keyed by kind
pub struct InMemoryResourceCache {
    records: DashMap<ResourceKind, Vec<Value>>,
    fetches: AtomicU64,
}

impl InMemoryResourceCache {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            fetches: AtomicU64::new(0),
        }
    }

    /// Build a cache from multi-document YAML (or JSON).
    ///
    /// `kind: List` documents contribute their `items`. Documents of kinds
    /// the evaluator never reads are dropped.
    pub fn from_manifests(manifests: &str) -> Result<Self> {
        let cache = Self::new();
        for (index, document) in serde_yaml::Deserializer::from_str(manifests).enumerate() {
            let value = Value::deserialize(document)?;
            if value.is_null() {
                continue;
            }
            cache.insert_document(index, value)?;
        }
        Ok(cache)
    }

    fn insert_document(&self, index: usize, document: Value) -> Result<()> {
        let kind = document
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(CacheError::MissingKind { index })?;

        if kind == "List" {
            let items = match document.get("items") {
                Some(Value::Array(items)) => items.clone(),
                _ => Vec::new(),
            };
            for item in items {
                self.insert_document(index, item)?;
            }
            return Ok(());
        }

        match ResourceKind::from_kind(kind) {
            Some(kind) => self.insert(kind, document),
            None => debug!(kind, index, "Skipping manifest of unwatched kind"),
        }
        Ok(())
    }

    /// Append one record
    pub fn insert(&self, kind: ResourceKind, record: Value) {
        self.records.entry(kind).or_default().push(record);
    }

    /// Replace every record of `kind`
    pub fn set_all(&self, kind: ResourceKind, records: Vec<Value>) {
        self.records.insert(kind, records);
    }

    /// Number of records held for `kind`
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.records.get(&kind).map(|r| r.len()).unwrap_or(0)
    }

    /// Number of `get_all` calls served so far
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryResourceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceCache for InMemoryResourceCache {
    async fn get_all(&self, kind: ResourceKind) -> Vec<Value> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.records
            .get(&kind)
            .map(|r| r.value().clone())
            .unwrap_or_default()
    }
}
