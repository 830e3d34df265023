#[macro_use]
extern crate log;

mod auth;
mod create_comment;
mod create_space;
mod delete_space;
mod nearby_spaces;
mod upload_space_image;

pub mod prelude {
    pub use super::{
        auth::*, create_comment::*, create_space::*, delete_space::*, nearby_spaces::*,
        upload_space_image::*,
    };
}

pub mod error;

pub type Result<T> = std::result::Result<T, error::AppError>;

pub(crate) use psdb_core::{entities::*, session::Session, usecases};

#[cfg(test)]
pub(crate) mod tests;

pub(crate) mod sqlite {
    pub use psdb_db_sqlite::Connections;
}
