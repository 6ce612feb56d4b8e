//! Poll loop driving a resource to a verdict

use crate::error::{CliError, CliResult};
use async_trait::async_trait;
use chrono::Utc;
use kdeploy_cache::InMemoryResourceCache;
use kdeploy_resources::Syncable;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Where each cycle's cluster snapshot comes from
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn load(&self) -> CliResult<InMemoryResourceCache>;
}

/// Re-reads a multi-document manifest file on every load
pub struct FileManifests {
    path: PathBuf,
}

impl FileManifests {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ManifestSource for FileManifests {
    async fn load(&self) -> CliResult<InMemoryResourceCache> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CliError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        Ok(InMemoryResourceCache::from_manifests(&text)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    Succeeded,
    Failed,
    TimedOut,
}

impl WatchOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            WatchOutcome::Succeeded => 0,
            WatchOutcome::Failed => 1,
            WatchOutcome::TimedOut => 2,
        }
    }
}

pub struct Watcher<S> {
    source: S,
    interval: Duration,
    timeout: Option<Duration>,
}

impl<S: ManifestSource> Watcher<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self {
            source,
            interval,
            timeout: None,
        }
    }

    /// Replace the resource's own timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sync until the resource succeeds, fails or runs out of time.
    ///
    /// Success is checked before failure. The deadline counts from the
    /// resource's `deploy_started_at`, or from the first cycle if unset.
    pub async fn run(&self, resource: &mut dyn Syncable) -> CliResult<WatchOutcome> {
        let started_at = resource.deploy_started_at().unwrap_or_else(Utc::now);
        let mut last_status: Option<String> = None;
        let mut cycles = 0u64;

        loop {
            let cache = self.source.load().await?;
            resource.sync(&cache).await;
            cycles += 1;

            let status = resource.status();
            if last_status.as_deref() != Some(status.as_str()) {
                info!(resource = %resource.identity(), status = %status, "Status changed");
                last_status = Some(status);
            }

            if resource.deploy_succeeded() {
                debug!(cycles, "Rollout succeeded");
                return Ok(WatchOutcome::Succeeded);
            }
            if resource.deploy_failed() {
                debug!(cycles, "Rollout failed");
                return Ok(WatchOutcome::Failed);
            }

            let timed_out = match self.timeout {
                Some(limit) => Utc::now()
                    .signed_duration_since(started_at)
                    .to_std()
                    .is_ok_and(|elapsed| elapsed >= limit),
                None => resource.deploy_timed_out(),
            };
            if timed_out {
                debug!(cycles, "Rollout timed out");
                return Ok(WatchOutcome::TimedOut);
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}
