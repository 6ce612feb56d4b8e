//! Command implementations

pub mod status;
pub mod watch;

use clap::Args;
use kdeploy_types::ResourceIdentity;
use std::path::PathBuf;

/// Which DaemonSet to evaluate, and where its cluster snapshot lives
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Multi-document YAML holding the DaemonSet, its pods and the nodes
    #[arg(short, long)]
    pub manifests: PathBuf,

    /// Namespace of the DaemonSet
    #[arg(short, long, env = "KDEPLOY_NAMESPACE")]
    pub namespace: String,

    /// Name of the DaemonSet
    #[arg(long)]
    pub name: String,
}

impl TargetArgs {
    pub fn identity(&self) -> ResourceIdentity {
        ResourceIdentity::daemon_set(&self.namespace, &self.name)
    }
}
