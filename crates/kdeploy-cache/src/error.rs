//! Cache error types

use thiserror::Error;

/// Errors raised while populating a cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Invalid manifest document: {0}")]
    InvalidManifest(#[from] serde_yaml::Error),

    #[error("Manifest document {index} has no kind")]
    MissingKind { index: usize },
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
