//! # psdb-core
//!
//! Business rules of the protected spaces database: repository and
//! gateway traits, use cases, pagination state and the user session.

pub mod db;
pub mod gateways;
pub mod pagination;
pub mod repositories;
pub mod session;
pub mod usecases;
pub mod util;

pub mod entities {
    pub use psdb_entities::{
        activity::*, address::*, comment::*, cursor::*, geo::*, geohash::*, id::*, space::*,
        time::*, url::*, user::*,
    };
}
