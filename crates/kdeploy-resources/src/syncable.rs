//! The Syncable capability
//!
//! Every resource kind the deploy tool watches implements [`Syncable`]. The
//! orchestrator calls `sync` once per polling cycle with a fresh cache and
//! then reads the predicates; it owns the polling loop and the overall
//! deadline.

use crate::error::Result;
use crate::logs::{DebugLogs, PodLogSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kdeploy_cache::ResourceCache;
use kdeploy_types::ResourceIdentity;
use std::time::Duration;

/// Status text of a resource that is absent from the cache
pub const NOT_FOUND_STATUS: &str = "Not Found";

/// Timeout message used when no more specific cause is known
pub const STANDARD_TIMEOUT_MESSAGE: &str = "Kubernetes will continue to attempt to deploy this \
resource in the cluster, but at this point it is considered unlikely that it will succeed.\n\
If you have reason to believe it will succeed, retry the deploy to continue to monitor the rollout.";

/// A watched resource, refreshed from the cache every cycle
#[async_trait]
pub trait Syncable: Send + Sync {
    fn identity(&self) -> &ResourceIdentity;

    /// Replace all cached state with what `cache` currently holds
    async fn sync(&mut self, cache: &dyn ResourceCache);

    fn exists(&self) -> bool;

    /// Human-readable status for progress output
    fn status(&self) -> String {
        if self.exists() {
            "Exists".to_string()
        } else {
            NOT_FOUND_STATUS.to_string()
        }
    }

    fn deploy_succeeded(&self) -> bool;

    fn deploy_failed(&self) -> bool;

    /// How long a deploy may run before it counts as timed out
    fn timeout(&self) -> Duration;

    /// When the deploy being watched started, if known
    fn deploy_started_at(&self) -> Option<DateTime<Utc>>;

    /// Timed out at `now`: started, not yet succeeded or failed, and
    /// running for longer than `timeout()`
    fn deploy_timed_out_at(&self, now: DateTime<Utc>) -> bool {
        let Some(started) = self.deploy_started_at() else {
            return false;
        };
        if self.deploy_succeeded() || self.deploy_failed() {
            return false;
        }
        now.signed_duration_since(started)
            .to_std()
            .map(|elapsed| elapsed > self.timeout())
            .unwrap_or(false)
    }

    fn deploy_timed_out(&self) -> bool {
        self.deploy_timed_out_at(Utc::now())
    }

    /// Whether `fetch_debug_logs` has something to fetch
    fn can_print_debug_logs(&self) -> bool;

    async fn fetch_debug_logs(&self, source: &dyn PodLogSource) -> Result<DebugLogs>;
}
