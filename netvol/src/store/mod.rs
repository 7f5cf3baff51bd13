//! Registry store: durable name → [`VolumeMetadata`](crate::volumes::VolumeMetadata) map.
//!
//! Every call is one self-contained cycle:
//! advisory lock → open database → one transaction → close database → unlock.

pub mod lock;
mod registry;

pub use lock::{AdvisoryLock, AdvisoryLockGuard};
pub use registry::RegistryStore;
