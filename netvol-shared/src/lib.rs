//! netvol shared - error types and on-disk constants
//!
//! This crate contains the pieces used by both the volume registry
//! library (netvol) and the operator CLI.

pub mod constants;
pub mod errors;

pub use errors::{NetvolError, NetvolResult};
