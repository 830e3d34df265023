mod cleanup_space_images;
mod create_new_comment;
mod create_new_space;
mod delete_space;
mod error;
mod find_nearby_spaces;
mod load_comments;
mod load_spaces;
mod upload_space_image;


pub use self::{
    cleanup_space_images::*, create_new_comment::*, create_new_space::*, delete_space::*,
    error::Error, find_nearby_spaces::*, load_comments::*, load_spaces::*,
    upload_space_image::*,
};

/// Upper bound for the number of items per page.
pub const MAX_PAGE_SIZE: u64 = 100;

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{db::*, entities::*, repositories::*};
}
use self::prelude::*;

fn validate_page(page: &PageRequest) -> Result<()> {
    match page.limit {
        Some(0) => Err(Error::InvalidLimit),
        Some(limit) if limit > MAX_PAGE_SIZE => Err(Error::InvalidLimit),
        _ => Ok(()),
    }
}

fn limited_page(page: &PageRequest) -> Result<PageRequest> {
    validate_page(page)?;
    Ok(PageRequest {
        after: page.after.clone(),
        limit: Some(page.limit.unwrap_or(MAX_PAGE_SIZE)),
    })
}

fn signed_in(user: Option<&UserRef>) -> Result<&UserRef> {
    user.ok_or(Error::Unauthorized)
}
