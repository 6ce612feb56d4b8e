//! Debug target selection
//!
//! When a rollout fails or times out, logs are pulled from a single pod. A
//! failed pod explains more than a timed-out one, which explains more than
//! an arbitrary one.

/// What the selector needs to know about a pod
pub trait DebugCandidate {
    fn has_failed(&self) -> bool;
    fn has_timed_out(&self) -> bool;
}

/// First failed pod, else first timed-out pod, else the first pod.
///
/// `None` only for an empty list.
pub fn select_debug_target<T: DebugCandidate>(pods: &[T]) -> Option<&T> {
    pods.iter()
        .find(|p| p.has_failed())
        .or_else(|| pods.iter().find(|p| p.has_timed_out()))
        .or_else(|| pods.first())
}
