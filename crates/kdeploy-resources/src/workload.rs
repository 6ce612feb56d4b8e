//! Per-cycle view of the DaemonSet object itself

use kdeploy_cache::LabelSelector;
use kdeploy_types::{DaemonSetManifest, Uid};

/// Immutable snapshot of the fields the rollout verdict reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSnapshot {
    pub uid: Option<Uid>,
    pub metadata_generation: i64,
    pub template_generation: i64,
    pub observed_generation: i64,
    pub desired_count: i64,
    pub updated_count: i64,
    pub ready_count: i64,
    pub selector: LabelSelector,
}

impl WorkloadSnapshot {
    pub fn from_manifest(manifest: &DaemonSetManifest) -> Self {
        Self {
            uid: manifest.metadata.uid.clone().map(Uid::new),
            metadata_generation: manifest.metadata.generation,
            template_generation: manifest.spec.template_generation,
            observed_generation: manifest.status.observed_generation,
            desired_count: manifest.status.desired_number_scheduled,
            updated_count: manifest.status.updated_number_scheduled,
            ready_count: manifest.status.number_ready,
            selector: LabelSelector::from(&manifest.spec.selector),
        }
    }

    /// The controller has written status for the current spec revision
    pub fn is_observed(&self) -> bool {
        self.metadata_generation == self.observed_generation
    }

    /// Counter fields in display order
    pub fn rollout_counts(&self) -> [(&'static str, i64); 3] {
        [
            ("updatedNumberScheduled", self.updated_count),
            ("desiredNumberScheduled", self.desired_count),
            ("numberReady", self.ready_count),
        ]
    }
}
