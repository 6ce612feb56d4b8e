//! Pod log collaborator
//!
//! Log transport (an API stream, `kubectl logs`, a saved file) lives behind
//! [`PodLogSource`]; resources only decide which pod and containers to ask
//! for.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use kdeploy_types::ResourceIdentity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lines requested per container unless configured otherwise
pub const DEFAULT_LOG_TAIL_LINES: usize = 250;

/// What to fetch from one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub container: String,
    /// Only lines written after this instant
    pub since: Option<DateTime<Utc>>,
    /// Keep at most this many trailing lines
    pub tail_lines: usize,
}

/// Source of container logs
#[async_trait]
pub trait PodLogSource: Send + Sync {
    async fn fetch_logs(&self, pod: &ResourceIdentity, query: &LogQuery) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerLogs {
    pub container: String,
    pub lines: Vec<String>,
}

/// Logs of every container of one pod
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugLogs {
    pub pod: ResourceIdentity,
    pub containers: Vec<ContainerLogs>,
}

impl DebugLogs {
    pub fn is_empty(&self) -> bool {
        self.containers.iter().all(|c| c.lines.is_empty())
    }

    pub fn line_count(&self) -> usize {
        self.containers.iter().map(|c| c.lines.len()).sum()
    }
}

impl fmt::Display for DebugLogs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for container in &self.containers {
            writeln!(f, "Logs from {} container '{}':", self.pod, container.container)?;
            if container.lines.is_empty() {
                writeln!(f, "  - Logs empty")?;
            }
            for line in &container.lines {
                writeln!(f, "  {}", line)?;
            }
        }
        Ok(())
    }
}

/// Log source backed by a map of `(pod, container) -> lines`
///
/// Lines carry no timestamps, so `LogQuery::since` is ignored.
pub struct InMemoryLogSource {
    logs: DashMap<(String, String), Vec<String>>,
}

impl InMemoryLogSource {
    pub fn new() -> Self {
        Self {
            logs: DashMap::new(),
        }
    }

    /// Parse a YAML document of the form `pod: { container: [lines] }`
    pub fn from_yaml(document: &str) -> Result<Self> {
        let parsed: BTreeMap<String, BTreeMap<String, Vec<String>>> =
            serde_yaml::from_str(document)?;
        let source = Self::new();
        for (pod, containers) in parsed {
            for (container, lines) in containers {
                source.insert(&pod, container, lines);
            }
        }
        Ok(source)
    }

    pub fn insert(&self, pod: &str, container: impl Into<String>, lines: Vec<String>) {
        self.logs.insert((pod.to_string(), container.into()), lines);
    }
}

impl Default for InMemoryLogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PodLogSource for InMemoryLogSource {
    async fn fetch_logs(&self, pod: &ResourceIdentity, query: &LogQuery) -> Result<Vec<String>> {
        let key = (pod.name.clone(), query.container.clone());
        let lines = match self.logs.get(&key) {
            Some(lines) => lines.value().clone(),
            None => return Ok(Vec::new()),
        };
        let skip = lines.len().saturating_sub(query.tail_lines);
        Ok(lines.into_iter().skip(skip).collect())
    }
}
