//! Resource error types

use kdeploy_types::ResourceIdentity;
use thiserror::Error;

/// Errors raised by resource operations
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Debug logs were requested while no pod is owned.
    /// Callers check `can_print_debug_logs()` first.
    #[error("No pod available to fetch debug logs for {resource}")]
    NoTargetAvailable { resource: ResourceIdentity },

    #[error("Resource not found: {0}")]
    NotFound(ResourceIdentity),

    #[error("Invalid log document: {0}")]
    InvalidLogDocument(#[from] serde_yaml::Error),
}

/// Result type for resource operations
pub type Result<T> = std::result::Result<T, ResourceError>;
