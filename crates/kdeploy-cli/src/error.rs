//! Error types for kdeploy-rollout

use kdeploy_cache::CacheError;
use kdeploy_resources::ResourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifests: {0}")]
    Manifests(#[from] CacheError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

pub type CliResult<T> = Result<T, CliError>;
