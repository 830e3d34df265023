// Low-level database access traits.
// Each repository is responsible for a single entity and
// its relationships. Related entities are only referenced
// by their id and never modified or loaded by another
// repository.

use crate::entities::*;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested object could not be found")]
    NotFound,
    #[error("The object already exists")]
    AlreadyExists,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

/// Request a page of items ordered by creation time (descending).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Start strictly after this item.
    pub after: Option<PageCursor>,
    pub limit: Option<u64>,
}

impl PageRequest {
    pub fn first(limit: u64) -> Self {
        Self {
            after: None,
            limit: Some(limit),
        }
    }

    pub fn after(cursor: PageCursor, limit: u64) -> Self {
        Self {
            after: Some(cursor),
            limit: Some(limit),
        }
    }
}

pub trait SpaceRepo {
    /// Atomically insert a new space unless a space with the
    /// same id exists (`Error::AlreadyExists`).
    fn create_space_if_absent(&self, space: &Space) -> Result<()>;
    fn update_space(&self, space: &Space) -> Result<()>;
    fn delete_space(&self, id: &str) -> Result<()>;

    fn get_space(&self, id: &str) -> Result<Space>;
    fn try_get_space(&self, id: &str) -> Result<Option<Space>> {
        match self.get_space(id) {
            Ok(space) => Ok(Some(space)),
            Err(Error::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
    fn count_spaces(&self) -> Result<usize>;

    // Ordered by geohash, both bounds are inclusive
    fn load_spaces_in_geohash_range(&self, range: &GeohashRange) -> Result<Vec<Space>>;

    fn recently_created_spaces(&self, page: &PageRequest) -> Result<Vec<Space>>;
    fn load_spaces_of_user(&self, user_id: &str, page: &PageRequest) -> Result<Vec<Space>>;
}

pub trait CommentRepo {
    fn create_comment(&self, comment: &Comment) -> Result<()>;

    fn load_comment(&self, id: &str) -> Result<Comment>;
    fn load_comments_of_space(&self, space_id: &str, page: &PageRequest) -> Result<Vec<Comment>>;
    fn count_comments_of_space(&self, space_id: &str) -> Result<usize>;

    fn delete_comments_of_space(&self, space_id: &str) -> Result<usize>;
}
