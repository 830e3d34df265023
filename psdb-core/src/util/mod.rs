pub mod address;
pub mod validate;
