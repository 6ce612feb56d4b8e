//! Pod lifecycle
//!
//! Readiness, failure and timeout signals for a single pod. A pod owned by
//! a workload inherits the workload's deploy start time, so its own timeout
//! counts from the same instant.

use crate::debug_target::DebugCandidate;
use crate::error::{ResourceError, Result};
use crate::logs::{ContainerLogs, DebugLogs, LogQuery, PodLogSource, DEFAULT_LOG_TAIL_LINES};
use crate::syncable::{Syncable, STANDARD_TIMEOUT_MESSAGE};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kdeploy_cache::ResourceCache;
use kdeploy_types::{
    decode, ContainerSpec, ContainerState, ContainerStateTerminated, ContainerStatus, PodManifest,
    PodStatus, ResourceIdentity, ResourceKind,
};
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const POD_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Failure reasons the controller recovers from by rescheduling
const TRANSIENT_FAILURE_REASONS: &[&str] = &["Evicted", "Preempting"];

#[derive(Debug, Clone)]
pub struct Pod {
    identity: ResourceIdentity,
    manifest: Option<PodManifest>,
    deploy_started_at: Option<DateTime<Utc>>,
    log_tail_lines: usize,
}

impl Pod {
    /// A pod known only by identity; populated by `sync`
    pub fn new(identity: ResourceIdentity) -> Self {
        Self {
            identity,
            manifest: None,
            deploy_started_at: None,
            log_tail_lines: DEFAULT_LOG_TAIL_LINES,
        }
    }

    /// A pod built from a record already read this cycle
    pub fn from_manifest(default_namespace: &str, manifest: PodManifest) -> Self {
        let namespace = manifest
            .metadata
            .namespace
            .clone()
            .unwrap_or_else(|| default_namespace.to_string());
        let identity = ResourceIdentity::pod(namespace, manifest.metadata.name.clone());
        Self {
            manifest: Some(manifest),
            ..Self::new(identity)
        }
    }

    pub fn with_deploy_started_at(mut self, started_at: Option<DateTime<Utc>>) -> Self {
        self.deploy_started_at = started_at;
        self
    }

    pub fn with_log_tail_lines(mut self, lines: usize) -> Self {
        self.log_tail_lines = lines;
        self
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn node_name(&self) -> Option<&str> {
        self.manifest.as_ref()?.spec.node_name.as_deref()
    }

    fn pod_status(&self) -> Option<&PodStatus> {
        self.manifest.as_ref()?.status.as_ref()
    }

    pub fn phase(&self) -> &str {
        self.pod_status()
            .and_then(|s| s.phase.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn reason(&self) -> Option<&str> {
        self.pod_status()
            .and_then(|s| s.reason.as_deref())
            .filter(|r| !r.is_empty())
    }

    /// The `Ready` condition is `"True"`
    pub fn is_ready(&self) -> bool {
        self.pod_status().is_some_and(|status| {
            status
                .conditions
                .iter()
                .any(|c| c.condition_type == "Ready" && c.status == "True")
        })
    }

    fn containers(&self) -> Vec<Container<'_>> {
        let Some(manifest) = &self.manifest else {
            return Vec::new();
        };
        let statuses: &[ContainerStatus] = self
            .pod_status()
            .map(|s| s.container_statuses.as_slice())
            .unwrap_or(&[]);

        if manifest.spec.containers.is_empty() {
            return statuses
                .iter()
                .map(|status| Container {
                    name: &status.name,
                    spec: None,
                    status: Some(status),
                })
                .collect();
        }

        manifest
            .spec
            .containers
            .iter()
            .map(|spec| Container {
                name: &spec.name,
                spec: Some(spec),
                status: statuses.iter().find(|s| s.name == spec.name),
            })
            .collect()
    }

    /// Why the pod is unlikely to ever become healthy, if it is
    pub fn failure_message(&self) -> Option<String> {
        let mut parts = Vec::new();

        if let Some(message) = self.phase_failure_message() {
            parts.push(message);
        }

        let doomed: Vec<String> = self
            .containers()
            .iter()
            .filter_map(|c| c.doom_reason().map(|reason| format!("> {}: {}", c.name, reason)))
            .collect();
        if !doomed.is_empty() {
            parts.push(format!(
                "The following containers are in a state that is unlikely to be recoverable:\n{}",
                doomed.join("\n")
            ));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    fn phase_failure_message(&self) -> Option<String> {
        let transient = self
            .reason()
            .is_some_and(|r| TRANSIENT_FAILURE_REASONS.contains(&r));
        if self.phase() == "Failed" && !transient {
            Some(format!("Pod status: {}.", self.status()))
        } else {
            None
        }
    }

    /// Best explanation for a pod that never became ready
    pub fn timeout_message(&self) -> String {
        let probe_failures = self.readiness_probe_failures();
        if !probe_failures.is_empty() {
            return format!(
                "The following containers have not passed their readiness probes on at least one pod:\n{}",
                probe_failures.join("\n")
            );
        }
        if let Some(reason) = self.failed_schedule_reason() {
            return format!("Pod could not be scheduled because {}", reason);
        }
        STANDARD_TIMEOUT_MESSAGE.to_string()
    }

    fn readiness_probe_failures(&self) -> Vec<String> {
        if self.is_ready() || self.phase() != "Running" {
            return Vec::new();
        }
        self.containers()
            .iter()
            .filter_map(Container::readiness_fail_reason)
            .collect()
    }

    fn failed_schedule_reason(&self) -> Option<&str> {
        if self.phase() != "Pending" {
            return None;
        }
        self.pod_status()?
            .conditions
            .iter()
            .find(|c| c.condition_type == "PodScheduled" && c.status == "False")
            .and_then(|c| c.message.as_deref())
    }

    fn container_names(&self) -> Vec<String> {
        self.containers().iter().map(|c| c.name.to_string()).collect()
    }
}

#[async_trait]
impl Syncable for Pod {
    fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }

    #[instrument(skip(self, cache), fields(pod = %self.identity))]
    async fn sync(&mut self, cache: &dyn ResourceCache) {
        let records = cache.get_all(ResourceKind::Pod).await;
        let manifest = records
            .iter()
            .filter_map(|record| match decode::<PodManifest>(record) {
                Ok(pod) => Some(pod),
                Err(e) => {
                    warn!(error = %e, "Skipping undecodable pod record");
                    None
                }
            })
            .find(|pod| {
                self.identity
                    .matches(&pod.metadata.name, pod.metadata.namespace.as_deref())
            });

        debug!(exists = manifest.is_some(), "Pod synced");
        self.manifest = manifest;
    }

    fn exists(&self) -> bool {
        self.manifest.is_some()
    }

    fn status(&self) -> String {
        match self.reason() {
            Some(reason) => format!("{} (Reason: {})", self.phase(), reason),
            None => self.phase().to_string(),
        }
    }

    fn deploy_succeeded(&self) -> bool {
        self.phase() == "Running" && self.is_ready()
    }

    fn deploy_failed(&self) -> bool {
        self.failure_message().is_some()
    }

    fn timeout(&self) -> Duration {
        POD_TIMEOUT
    }

    fn deploy_started_at(&self) -> Option<DateTime<Utc>> {
        self.deploy_started_at
    }

    fn can_print_debug_logs(&self) -> bool {
        self.exists()
    }

    async fn fetch_debug_logs(&self, source: &dyn PodLogSource) -> Result<DebugLogs> {
        if !self.exists() {
            return Err(ResourceError::NotFound(self.identity.clone()));
        }

        let mut containers = Vec::new();
        for container in self.container_names() {
            let query = LogQuery {
                container: container.clone(),
                since: self.deploy_started_at,
                tail_lines: self.log_tail_lines,
            };
            let lines = source.fetch_logs(&self.identity, &query).await?;
            containers.push(ContainerLogs { container, lines });
        }

        Ok(DebugLogs {
            pod: self.identity.clone(),
            containers,
        })
    }
}

impl DebugCandidate for Pod {
    fn has_failed(&self) -> bool {
        self.deploy_failed()
    }

    fn has_timed_out(&self) -> bool {
        self.deploy_timed_out()
    }
}

/// A container's spec paired with its reported status
struct Container<'a> {
    name: &'a str,
    spec: Option<&'a ContainerSpec>,
    status: Option<&'a ContainerStatus>,
}

impl Container<'_> {
    fn doom_reason(&self) -> Option<String> {
        let status = self.status?;

        if let Some(terminated) =
            cannot_run(&status.last_state).or_else(|| cannot_run(&status.state))
        {
            return Some(format!(
                "Failed to start (exit {}): {}",
                exit_code(Some(terminated)),
                terminated.message.as_deref().unwrap_or_default()
            ));
        }

        let waiting = status.state.waiting.as_ref()?;
        let message = waiting.message.as_deref().unwrap_or_default();
        match waiting.reason.as_deref() {
            Some("CrashLoopBackOff") => Some(format!(
                "Crashing repeatedly (exit {}). See logs for more information.",
                exit_code(status.last_state.terminated.as_ref())
            )),
            Some("ErrImagePull") if message.to_lowercase().contains("not found") => {
                Some(format!(
                    "Failed to pull image {}. Did you wait for it to be built and pushed to the registry before deploying?",
                    self.image()
                ))
            }
            Some("CreateContainerConfigError") => Some(format!(
                "Failed to generate container configuration: {}",
                message
            )),
            _ => None,
        }
    }

    fn readiness_fail_reason(&self) -> Option<String> {
        if self.status.is_some_and(|s| s.ready) {
            return None;
        }
        let probe = self.spec?.readiness_probe.as_ref()?;
        if let Some(http) = &probe.http_get {
            return Some(format!(
                "> {} must respond with a good status code at '{}'",
                self.name, http.path
            ));
        }
        probe.exec.as_ref().map(|exec| {
            format!(
                "> {} must exit 0 from the following command: '{}'",
                self.name,
                exec.command.join(" ")
            )
        })
    }

    fn image(&self) -> &str {
        match (self.spec, self.status) {
            (Some(spec), _) if !spec.image.is_empty() => &spec.image,
            (_, Some(status)) => &status.image,
            _ => "",
        }
    }
}

fn cannot_run(state: &ContainerState) -> Option<&ContainerStateTerminated> {
    state
        .terminated
        .as_ref()
        .filter(|t| t.reason.as_deref() == Some("ContainerCannotRun"))
}

fn exit_code(terminated: Option<&ContainerStateTerminated>) -> String {
    terminated
        .and_then(|t| t.exit_code)
        .map(|code| code.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
