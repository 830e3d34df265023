pub mod auth;
pub mod device;
pub mod file;
pub mod geocode;
pub mod space_events;
