//! netvol - named persistent volumes over a shared storage root.
//!
//! The crate is organised leaves first:
//! - [`volumes`]: the persisted record (`VolumeMetadata`) and its policy types
//! - [`store`]: the registry store (SQLite file + advisory lock, one transaction per call)
//! - [`driver`]: the lifecycle state machine, its backends and the driver registry
//! - [`mount`]: bootstrap mount of the remote filesystem onto the storage root
//! - [`plugin`]: translation of driver results into volume-plugin response shapes

pub mod driver;
pub mod layout;
pub mod mount;
pub mod plugin;
pub mod store;
pub mod volumes;

pub use driver::registry::{DriverFactoryFn, DriverRegistry};
pub use driver::{DriverContext, VolumeDriver};
pub use layout::StorageLayout;
pub use netvol_shared::errors::{NetvolError, NetvolResult};
pub use plugin::VolumePlugin;
pub use store::RegistryStore;
pub use volumes::{VolumeMetadata, VolumeSpec, VolumeStatus};
