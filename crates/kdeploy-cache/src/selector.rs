//! Equality-based label selectors

use kdeploy_types::LabelSelectorSpec;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Matches records whose `metadata.labels` contain every pair
///
/// An empty selector matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    labels: BTreeMap<String, String>,
}

impl LabelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn matches(&self, record: &Value) -> bool {
        let labels = record.pointer("/metadata/labels");
        self.labels.iter().all(|(key, expected)| {
            labels
                .and_then(|l| l.get(key))
                .and_then(Value::as_str)
                .is_some_and(|actual| actual == expected)
        })
    }
}

impl From<&LabelSelectorSpec> for LabelSelector {
    fn from(spec: &LabelSelectorSpec) -> Self {
        Self {
            labels: spec.match_labels.clone(),
        }
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        f.write_str(&pairs.join(","))
    }
}
