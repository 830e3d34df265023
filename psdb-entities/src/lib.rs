#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(test, deny(warnings))]

//! # psdb-entities
//!
//! Reusable, agnostic domain entities for the protected spaces database.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod activity;
pub mod address;
pub mod comment;
pub mod cursor;
pub mod geo;
pub mod geohash;
pub mod id;
pub mod space;
pub mod time;
pub mod user;
pub mod url {
    pub use url::{ParseError, Url};
}

#[cfg(any(test, feature = "builders"))]
pub mod builders;
