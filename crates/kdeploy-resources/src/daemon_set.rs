//! DaemonSet rollout evaluator
//!
//! Reconciles three views fetched independently each cycle: the DaemonSet's
//! own status counters, the pods it owns at the current template revision,
//! and the cluster's nodes. Verdicts are only given once the controller has
//! observed the current generation.

use crate::debug_target::select_debug_target;
use crate::error::{ResourceError, Result};
use crate::logs::{DebugLogs, PodLogSource, DEFAULT_LOG_TAIL_LINES};
use crate::node::NodeRegistry;
use crate::ownership::belongs_to;
use crate::pod::Pod;
use crate::rollout::RolloutState;
use crate::syncable::{Syncable, NOT_FOUND_STATUS, STANDARD_TIMEOUT_MESSAGE};
use crate::workload::WorkloadSnapshot;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kdeploy_cache::ResourceCache;
use kdeploy_types::{decode, DaemonSetManifest, ObjectMeta, PodManifest, ResourceIdentity, ResourceKind};
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const DAEMON_SET_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Everything read in one sync cycle. Replaced whole, never patched.
#[derive(Debug, Clone)]
struct DaemonSetView {
    /// `None` when the DaemonSet is absent from the cache
    workload: Option<WorkloadSnapshot>,
    /// Owned pods at the current template generation
    pods: Vec<Pod>,
    nodes: NodeRegistry,
}

impl DaemonSetView {
    /// Owned pods whose node is still in the inventory
    fn considered_pods(&self) -> impl Iterator<Item = &Pod> {
        self.pods
            .iter()
            .filter(|pod| pod.node_name().is_some_and(|node| self.nodes.contains(node)))
    }
}

pub struct DaemonSet {
    identity: ResourceIdentity,
    deploy_started_at: Option<DateTime<Utc>>,
    log_tail_lines: usize,
    view: Option<DaemonSetView>,
}

impl DaemonSet {
    pub fn new(identity: ResourceIdentity) -> Self {
        Self {
            identity,
            deploy_started_at: None,
            log_tail_lines: DEFAULT_LOG_TAIL_LINES,
            view: None,
        }
    }

    /// Record when the deploy began; owned pods inherit it
    pub fn with_deploy_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.deploy_started_at = Some(started_at);
        self
    }

    pub fn with_log_tail_lines(mut self, lines: usize) -> Self {
        self.log_tail_lines = lines;
        self
    }

    /// Owned pods from the last sync, in cache order
    pub fn pods(&self) -> &[Pod] {
        self.view.as_ref().map(|v| v.pods.as_slice()).unwrap_or(&[])
    }

    pub fn workload(&self) -> Option<&WorkloadSnapshot> {
        self.view.as_ref()?.workload.as_ref()
    }

    pub fn nodes(&self) -> Option<&NodeRegistry> {
        self.view.as_ref().map(|v| &v.nodes)
    }

    /// Owned pods scheduled onto nodes that are still present
    pub fn considered_pods(&self) -> Vec<&Pod> {
        match &self.view {
            Some(view) => view.considered_pods().collect(),
            None => Vec::new(),
        }
    }

    pub fn rollout_state(&self) -> RolloutState {
        if self.view.is_none() {
            RolloutState::Unknown
        } else if !self.exists() {
            RolloutState::NotFound
        } else if self.deploy_succeeded() {
            RolloutState::Succeeded
        } else if self.deploy_failed() {
            RolloutState::Failed
        } else {
            RolloutState::Progressing
        }
    }

    /// Distinct failure messages of the owned pods, one per line
    pub fn failure_message(&self) -> Option<String> {
        let messages = unique(self.pods().iter().filter_map(Pod::failure_message));
        if messages.is_empty() {
            None
        } else {
            Some(messages.join("\n"))
        }
    }

    /// Distinct timeout messages of the owned pods, one per line
    pub fn timeout_message(&self) -> String {
        if self.pods().is_empty() {
            return STANDARD_TIMEOUT_MESSAGE.to_string();
        }
        unique(self.pods().iter().map(Pod::timeout_message)).join("\n")
    }

    async fn find_workload(&self, cache: &dyn ResourceCache) -> Option<WorkloadSnapshot> {
        let records = cache.get_all(ResourceKind::DaemonSet).await;
        let record = records.iter().find(|record| {
            decode::<ObjectMeta>(&record["metadata"])
                .map(|meta| self.identity.matches(&meta.name, meta.namespace.as_deref()))
                .unwrap_or(false)
        })?;

        match decode::<DaemonSetManifest>(record) {
            Ok(manifest) => Some(WorkloadSnapshot::from_manifest(&manifest)),
            Err(e) => {
                warn!(error = %e, "DaemonSet record could not be decoded; treating as absent");
                None
            }
        }
    }

    async fn find_pods(&self, cache: &dyn ResourceCache, workload: &WorkloadSnapshot) -> Vec<Pod> {
        let records = if workload.selector.is_empty() {
            cache.get_all(ResourceKind::Pod).await
        } else {
            cache.get_matching(ResourceKind::Pod, &workload.selector).await
        };

        records
            .iter()
            .filter_map(|record| match decode::<PodManifest>(record) {
                Ok(pod) => Some(pod),
                Err(e) => {
                    warn!(error = %e, "Skipping undecodable pod record");
                    None
                }
            })
            .filter(|pod| belongs_to(pod, workload))
            .map(|pod| {
                Pod::from_manifest(&self.identity.namespace, pod)
                    .with_deploy_started_at(self.deploy_started_at)
                    .with_log_tail_lines(self.log_tail_lines)
            })
            .collect()
    }
}

#[async_trait]
impl Syncable for DaemonSet {
    fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }

    #[instrument(skip(self, cache), fields(daemon_set = %self.identity))]
    async fn sync(&mut self, cache: &dyn ResourceCache) {
        let workload = self.find_workload(cache).await;
        let pods = match &workload {
            Some(workload) => self.find_pods(cache, workload).await,
            None => Vec::new(),
        };
        let nodes = NodeRegistry::from_records(&cache.get_all(ResourceKind::Node).await);

        debug!(
            exists = workload.is_some(),
            pods = pods.len(),
            nodes = nodes.len(),
            "DaemonSet synced"
        );

        self.view = Some(DaemonSetView {
            workload,
            pods,
            nodes,
        });
    }

    fn exists(&self) -> bool {
        self.workload().is_some()
    }

    fn status(&self) -> String {
        let Some(workload) = self.workload() else {
            return NOT_FOUND_STATUS.to_string();
        };
        workload
            .rollout_counts()
            .iter()
            .map(|(field, count)| format!("{} {}", count, field))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn deploy_succeeded(&self) -> bool {
        let Some(workload) = self.workload() else {
            return false;
        };

        let considered = self.considered_pods();
        let considered_ready = !considered.is_empty() && considered.iter().all(|p| p.is_ready());

        let counts_match = workload.desired_count == workload.updated_count
            && (workload.desired_count == workload.ready_count || considered_ready);

        counts_match && workload.is_observed()
    }

    fn deploy_failed(&self) -> bool {
        let Some(workload) = self.workload() else {
            return false;
        };
        let pods = self.pods();
        !pods.is_empty() && pods.iter().any(|p| p.deploy_failed()) && workload.is_observed()
    }

    fn timeout(&self) -> Duration {
        DAEMON_SET_TIMEOUT
    }

    fn deploy_started_at(&self) -> Option<DateTime<Utc>> {
        self.deploy_started_at
    }

    /// Requesting logs for an empty pod set hangs until the log fetch times
    /// out, so the orchestrator skips it.
    fn can_print_debug_logs(&self) -> bool {
        !self.pods().is_empty()
    }

    async fn fetch_debug_logs(&self, source: &dyn PodLogSource) -> Result<DebugLogs> {
        let target =
            select_debug_target(self.pods()).ok_or_else(|| ResourceError::NoTargetAvailable {
                resource: self.identity.clone(),
            })?;
        debug!(pod = %target.identity(), "Fetching debug logs");
        target.fetch_debug_logs(source).await
    }
}

fn unique(messages: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for message in messages {
        if !seen.contains(&message) {
            seen.push(message);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::InMemoryLogSource;
    use crate::pod::POD_TIMEOUT;
    use kdeploy_cache::InMemoryResourceCache;
    use serde_json::{json, Value};

    const UID: &str = "c31a9b4e-e6dd-11e9-8f47-e6322f98393a";

    fn ds_record(generation: i64, status: Value) -> Value {
        json!({
            "kind": "DaemonSet",
            "metadata": { "name": "ds-app", "namespace": "test", "uid": UID, "generation": generation },
            "spec": {
                "templateGeneration": 2,
                "selector": { "matchLabels": { "app": "ds-app" } }
            },
            "status": status
        })
    }

    fn pod_record(name: &str, node: &str, ready: bool) -> Value {
        pod_record_with(name, node, ready, "2", json!({}))
    }

    fn pod_record_with(name: &str, node: &str, ready: bool, generation: &str, waiting: Value) -> Value {
        let ready_condition = if ready { "True" } else { "False" };
        json!({
            "kind": "Pod",
            "metadata": {
                "name": name,
                "namespace": "test",
                "labels": { "app": "ds-app", "pod-template-generation": generation },
                "ownerReferences": [{ "kind": "DaemonSet", "uid": UID }]
            },
            "spec": { "nodeName": node, "containers": [{ "name": "app", "image": "app:2" }] },
            "status": {
                "phase": "Running",
                "conditions": [{ "type": "Ready", "status": ready_condition }],
                "containerStatuses": [{ "name": "app", "ready": ready, "state": waiting }]
            }
        })
    }

    fn crashing_pod_record(name: &str, node: &str) -> Value {
        pod_record_with(
            name,
            node,
            false,
            "2",
            json!({ "waiting": { "reason": "CrashLoopBackOff" } }),
        )
    }

    fn node_record(name: &str) -> Value {
        json!({ "kind": "Node", "metadata": { "name": name } })
    }

    fn cache(ds: Option<Value>, pods: Vec<Value>, nodes: &[&str]) -> InMemoryResourceCache {
        let cache = InMemoryResourceCache::new();
        if let Some(ds) = ds {
            cache.insert(ResourceKind::DaemonSet, ds);
        }
        cache.set_all(ResourceKind::Pod, pods);
        cache.set_all(ResourceKind::Node, nodes.iter().map(|n| node_record(n)).collect());
        cache
    }

    async fn synced(cache: &InMemoryResourceCache) -> DaemonSet {
        let mut ds = DaemonSet::new(ResourceIdentity::daemon_set("test", "ds-app"));
        ds.sync(cache).await;
        ds
    }

    fn counts(observed: i64, desired: i64, updated: i64, ready: i64) -> Value {
        json!({
            "observedGeneration": observed,
            "desiredNumberScheduled": desired,
            "updatedNumberScheduled": updated,
            "numberReady": ready
        })
    }

    #[tokio::test]
    async fn test_unknown_before_first_sync() {
        let ds = DaemonSet::new(ResourceIdentity::daemon_set("test", "ds-app"));
        assert_eq!(ds.rollout_state(), RolloutState::Unknown);
        assert!(!ds.deploy_succeeded());
        assert!(!ds.deploy_failed());
        assert!(!ds.can_print_debug_logs());
    }

    #[tokio::test]
    async fn test_not_found() {
        let ds = synced(&cache(None, vec![crashing_pod_record("p1", "node-1")], &["node-1"])).await;

        assert!(!ds.exists());
        assert!(!ds.deploy_succeeded());
        assert!(!ds.deploy_failed());
        assert_eq!(ds.status(), NOT_FOUND_STATUS);
        assert_eq!(ds.rollout_state(), RolloutState::NotFound);
        assert!(ds.pods().is_empty());
        // the node list is refreshed even without the workload
        assert_eq!(ds.nodes().map(NodeRegistry::len), Some(1));
    }

    #[tokio::test]
    async fn test_succeeds_when_counts_match() {
        let ds = synced(&cache(Some(ds_record(2, counts(2, 2, 2, 2))), vec![], &[])).await;
        assert!(ds.deploy_succeeded());
        assert_eq!(ds.rollout_state(), RolloutState::Succeeded);
    }

    #[tokio::test]
    async fn test_status_line() {
        let ds = synced(&cache(Some(ds_record(2, counts(2, 3, 1, 2))), vec![], &[])).await;
        assert_eq!(
            ds.status(),
            "1 updatedNumberScheduled, 3 desiredNumberScheduled, 2 numberReady"
        );
    }

    #[tokio::test]
    async fn test_status_line_defaults_missing_counters() {
        let ds = synced(&cache(Some(ds_record(2, json!({}))), vec![], &[])).await;
        assert_eq!(
            ds.status(),
            "0 updatedNumberScheduled, 0 desiredNumberScheduled, 0 numberReady"
        );
    }

    #[tokio::test]
    async fn test_partial_rollout_never_succeeds() {
        for ready in [0, 2, 3] {
            let pods = vec![pod_record("p1", "node-1", true), pod_record("p2", "node-2", true)];
            let ds = synced(&cache(
                Some(ds_record(2, counts(2, 3, 2, ready))),
                pods,
                &["node-1", "node-2"],
            ))
            .await;
            assert!(!ds.deploy_succeeded(), "ready={}", ready);
        }
    }

    #[tokio::test]
    async fn test_stale_status_blocks_success() {
        let ds = synced(&cache(Some(ds_record(2, counts(1, 2, 2, 2))), vec![], &[])).await;
        assert!(!ds.deploy_succeeded());
        assert_eq!(ds.rollout_state(), RolloutState::Progressing);
    }

    #[tokio::test]
    async fn test_pod_readiness_cross_check() {
        // controller says 2 of 3 ready, but every pod on a live node is ready
        let pods = vec![
            pod_record("p1", "node-1", true),
            pod_record("p2", "node-2", true),
            pod_record("p3", "node-gone", false),
        ];
        let ds = synced(&cache(
            Some(ds_record(2, counts(2, 3, 3, 2))),
            pods,
            &["node-1", "node-2"],
        ))
        .await;

        assert_eq!(ds.considered_pods().len(), 2);
        assert!(ds.deploy_succeeded());
    }

    #[tokio::test]
    async fn test_unready_considered_pod_blocks_cross_check() {
        let pods = vec![pod_record("p1", "node-1", true), pod_record("p2", "node-2", false)];
        let ds = synced(&cache(
            Some(ds_record(2, counts(2, 2, 2, 1))),
            pods,
            &["node-1", "node-2"],
        ))
        .await;
        assert!(!ds.deploy_succeeded());
    }

    #[tokio::test]
    async fn test_ready_count_alone_with_no_considered_pods() {
        let pods = vec![pod_record("p1", "node-gone", false)];
        let ds = synced(&cache(Some(ds_record(2, counts(2, 1, 1, 1))), pods, &["node-1"])).await;

        assert!(ds.considered_pods().is_empty());
        assert!(ds.deploy_succeeded());
    }

    #[tokio::test]
    async fn test_no_considered_pods_and_ready_count_short() {
        let pods = vec![pod_record("p1", "node-gone", true)];
        let ds = synced(&cache(Some(ds_record(2, counts(2, 1, 1, 0))), pods, &["node-1"])).await;
        assert!(!ds.deploy_succeeded());
    }

    #[tokio::test]
    async fn test_failed_pod_fails_rollout() {
        let pods = vec![pod_record("p1", "node-1", true), crashing_pod_record("p2", "node-2")];
        let ds = synced(&cache(
            Some(ds_record(2, counts(2, 2, 2, 1))),
            pods,
            &["node-1", "node-2"],
        ))
        .await;

        assert!(ds.deploy_failed());
        assert_eq!(ds.rollout_state(), RolloutState::Failed);
        assert!(ds
            .failure_message()
            .unwrap()
            .contains("> app: Crashing repeatedly"));
    }

    #[tokio::test]
    async fn test_failure_ignored_until_generation_observed() {
        let pods = vec![crashing_pod_record("p1", "node-1")];
        let ds = synced(&cache(Some(ds_record(2, counts(1, 1, 1, 0))), pods, &["node-1"])).await;

        assert!(!ds.deploy_failed());
        assert_eq!(ds.rollout_state(), RolloutState::Progressing);
    }

    #[tokio::test]
    async fn test_pods_of_previous_template_ignored() {
        let pods = vec![
            pod_record_with("old", "node-1", false, "1", json!({ "waiting": { "reason": "CrashLoopBackOff" } })),
            pod_record("new", "node-1", true),
        ];
        let ds = synced(&cache(Some(ds_record(2, counts(2, 1, 1, 0))), pods, &["node-1"])).await;

        let names: Vec<&str> = ds.pods().iter().map(Pod::name).collect();
        assert_eq!(names, vec!["new"]);
        assert!(!ds.deploy_failed());
        assert!(ds.deploy_succeeded());
    }

    #[tokio::test]
    async fn test_pods_outside_selector_ignored() {
        let mut stray = pod_record("stray", "node-1", true);
        stray["metadata"]["labels"]["app"] = json!("other");
        let ds = synced(&cache(Some(ds_record(2, counts(2, 1, 1, 0))), vec![stray], &["node-1"])).await;
        assert!(ds.pods().is_empty());
    }

    #[tokio::test]
    async fn test_each_sync_replaces_state() {
        let mut ds = DaemonSet::new(ResourceIdentity::daemon_set("test", "ds-app"));

        let first = cache(
            Some(ds_record(2, counts(2, 1, 1, 1))),
            vec![pod_record("p1", "node-1", true)],
            &["node-1"],
        );
        ds.sync(&first).await;
        assert!(ds.deploy_succeeded());
        assert_eq!(ds.pods().len(), 1);

        ds.sync(&cache(None, vec![], &["node-1"])).await;
        assert!(!ds.exists());
        assert!(ds.pods().is_empty());
        assert!(!ds.deploy_succeeded());

        ds.sync(&first).await;
        assert!(ds.deploy_succeeded());
    }

    #[tokio::test]
    async fn test_sync_fetches_each_kind_once() {
        let cache = cache(Some(ds_record(2, counts(2, 1, 1, 1))), vec![], &[]);
        synced(&cache).await;
        assert_eq!(cache.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_debug_logs_from_failed_pod() {
        let pods = vec![pod_record("p1", "node-1", true), crashing_pod_record("p2", "node-1")];
        let ds = synced(&cache(Some(ds_record(2, counts(2, 2, 1, 1))), pods, &["node-1"])).await;

        let source = InMemoryLogSource::new();
        source.insert("p1", "app", vec!["fine".into()]);
        source.insert("p2", "app", vec!["panic: boom".into()]);

        assert!(ds.can_print_debug_logs());
        let logs = ds.fetch_debug_logs(&source).await.unwrap();
        assert_eq!(logs.pod, ResourceIdentity::pod("test", "p2"));
        assert_eq!(logs.containers[0].lines, vec!["panic: boom"]);
    }

    #[tokio::test]
    async fn test_null_status_block_still_exists() {
        let cache = InMemoryResourceCache::from_manifests(
            "kind: DaemonSet\nmetadata: {name: ds-app, namespace: test, uid: u-1, generation: 1}\nspec: {templateGeneration: 1}\nstatus:\n",
        )
        .unwrap();
        let ds = synced(&cache).await;

        assert!(ds.exists());
        assert_eq!(
            ds.status(),
            "0 updatedNumberScheduled, 0 desiredNumberScheduled, 0 numberReady"
        );
        assert_ne!(ds.rollout_state(), RolloutState::NotFound);
    }

    #[tokio::test]
    async fn test_debug_logs_from_timed_out_pod() {
        let pods = vec![pod_record("p1", "node-1", true), pod_record("p2", "node-2", false)];
        let cache = cache(
            Some(ds_record(2, counts(2, 2, 2, 1))),
            pods,
            &["node-1", "node-2"],
        );
        let started = Utc::now() - (chrono::Duration::from_std(POD_TIMEOUT).unwrap() + chrono::Duration::minutes(1));

        let mut ds = DaemonSet::new(ResourceIdentity::daemon_set("test", "ds-app"))
            .with_deploy_started_at(started);
        ds.sync(&cache).await;

        assert!(!ds.deploy_failed());
        assert!(!ds.pods()[0].deploy_timed_out());
        assert!(ds.pods()[1].deploy_timed_out());

        let source = InMemoryLogSource::new();
        source.insert("p1", "app", vec!["healthy".into()]);
        source.insert("p2", "app", vec!["waiting for upstream".into()]);

        let logs = ds.fetch_debug_logs(&source).await.unwrap();
        assert_eq!(logs.pod, ResourceIdentity::pod("test", "p2"));
        assert_eq!(logs.containers[0].lines, vec!["waiting for upstream"]);
    }

    #[tokio::test]
    async fn test_debug_logs_without_pods() {
        let ds = synced(&cache(Some(ds_record(2, counts(2, 1, 0, 0))), vec![], &["node-1"])).await;

        assert!(!ds.can_print_debug_logs());
        let result = ds.fetch_debug_logs(&InMemoryLogSource::new()).await;
        assert!(matches!(result, Err(ResourceError::NoTargetAvailable { .. })));
    }

    #[tokio::test]
    async fn test_timeout_messages() {
        let empty = synced(&cache(Some(ds_record(2, counts(2, 1, 0, 0))), vec![], &[])).await;
        assert_eq!(empty.timeout_message(), STANDARD_TIMEOUT_MESSAGE);
        assert_eq!(empty.failure_message(), None);

        let pods = vec![pod_record("p1", "node-1", true), pod_record("p2", "node-2", true)];
        let ds = synced(&cache(Some(ds_record(2, counts(2, 2, 1, 1))), pods, &[])).await;
        // identical pod messages collapse into one
        assert_eq!(ds.timeout_message(), STANDARD_TIMEOUT_MESSAGE);
    }

    #[tokio::test]
    async fn test_deploy_timed_out() {
        let cache = cache(Some(ds_record(2, counts(2, 2, 1, 1))), vec![], &[]);
        let started = Utc::now() - chrono::Duration::minutes(6);

        let mut ds = DaemonSet::new(ResourceIdentity::daemon_set("test", "ds-app"))
            .with_deploy_started_at(started);
        ds.sync(&cache).await;

        assert!(ds.deploy_timed_out());
        assert!(!ds.deploy_timed_out_at(started + chrono::Duration::minutes(4)));
    }
}
