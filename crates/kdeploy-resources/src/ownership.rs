//! Pod ownership
//!
//! A pod belongs to the workload when it is owned by the workload's uid AND
//! was created from the current pod template. The template check keeps pods
//! of the previous revision, still terminating mid-rollout, out of the
//! verdict.

use crate::workload::WorkloadSnapshot;
use kdeploy_types::PodManifest;

pub fn belongs_to(pod: &PodManifest, workload: &WorkloadSnapshot) -> bool {
    let Some(uid) = &workload.uid else {
        return false;
    };
    pod.metadata.is_owned_by(uid.as_str())
        && pod.template_generation() == Some(workload.template_generation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kdeploy_cache::LabelSelector;
    use kdeploy_types::{decode, Uid};
    use serde_json::json;

    fn workload(uid: Option<&str>, template_generation: i64) -> WorkloadSnapshot {
        WorkloadSnapshot {
            uid: uid.map(Uid::new),
            metadata_generation: 2,
            template_generation,
            observed_generation: 2,
            desired_count: 1,
            updated_count: 1,
            ready_count: 1,
            selector: LabelSelector::new(),
        }
    }

    fn pod(owner: &str, generation: Option<&str>) -> PodManifest {
        let mut labels = serde_json::Map::new();
        if let Some(g) = generation {
            labels.insert("pod-template-generation".into(), json!(g));
        }
        decode(&json!({
            "metadata": {
                "name": "ds-app-1",
                "labels": labels,
                "ownerReferences": [{ "kind": "DaemonSet", "uid": owner }]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_owner_and_generation_match() {
        assert!(belongs_to(&pod("u-1", Some("2")), &workload(Some("u-1"), 2)));
    }

    #[test]
    fn test_other_owner_rejected() {
        assert!(!belongs_to(&pod("u-9", Some("2")), &workload(Some("u-1"), 2)));
    }

    #[test]
    fn test_previous_template_revision_rejected() {
        assert!(!belongs_to(&pod("u-1", Some("1")), &workload(Some("u-1"), 2)));
    }

    #[test]
    fn test_missing_label_rejected() {
        assert!(!belongs_to(&pod("u-1", None), &workload(Some("u-1"), 0)));
    }

    #[test]
    fn test_workload_without_uid_owns_nothing() {
        assert!(!belongs_to(&pod("", Some("2")), &workload(None, 2)));
    }

    #[test]
    fn test_pod_without_owner_references_rejected() {
        let orphan: PodManifest = decode(&json!({
            "metadata": { "name": "x", "labels": { "pod-template-generation": "2" } }
        }))
        .unwrap();
        assert!(!belongs_to(&orphan, &workload(Some("u-1"), 2)));
    }
}
