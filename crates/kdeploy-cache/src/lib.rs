//! kdeploy Cache - Per-cycle resource cache
//!
//! Every sync cycle the deploy tool fetches each resource kind once and hands
//! the result to all resources being watched. This crate defines that
//! collaborator:
//!
//! - **ResourceCache**: `get_all(kind)` returning raw records
//! - **LabelSelector**: equality-based label filtering of raw records
//! - **InMemoryResourceCache**: a DashMap-backed cache, loadable from
//!   manifest files
//!
//! ## Consistency
//!
//! Each kind is fetched independently. Two `get_all` calls within one cycle
//! may observe different instants of cluster state; callers must tolerate
//! that gap.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod cache;
pub mod error;
pub mod memory;
pub mod selector;

// Re-exports
pub use cache::ResourceCache;
pub use error::{CacheError, Result};
pub use memory::InMemoryResourceCache;
pub use selector::LabelSelector;
