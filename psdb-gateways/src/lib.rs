//! # psdb-gateways
//!
//! Implementations of the gateways that connect the core
//! with the outside world: local files, the on-device store,
//! the identity provider and geocoding.

pub mod cleanup;
pub mod device;
pub mod files;
pub mod identity;
pub mod opencage;
