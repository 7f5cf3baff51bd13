//! Volume metadata model.
//!
//! A volume is persisted as one [`VolumeMetadata`] record:
//! immutable policy ([`VolumeSpec`]) fixed at creation, and mutable
//! mount state ([`VolumeStatus`]) changed by mount/unmount.

mod metadata;
mod spec;
mod status;

pub use metadata::VolumeMetadata;
pub use spec::{VolumeSpec, parse_bool};
pub use status::VolumeStatus;
