use crate::{
    repositories,
    util::validate::{CommentInvalidation, SpaceInvalidation},
};
use psdb_entities::{cursor::PageCursorDecodingError, id::Id, space::ImageRefError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("A space already exists at this address ({0})")]
    DuplicateAddress(Id),
    #[error("This is not allowed")]
    Forbidden,
    #[error("This is not allowed without auth")]
    Unauthorized,
    #[error(transparent)]
    Space(#[from] SpaceInvalidation),
    #[error("Empty comment")]
    EmptyComment,
    #[error("The comment is too long")]
    CommentTooLong,
    #[error("Invalid position")]
    InvalidPosition,
    #[error("Invalid search radius")]
    InvalidRadius,
    #[error("The current location is unknown")]
    MissingLocation,
    #[error("Invalid limit")]
    InvalidLimit,
    #[error("Invalid page cursor")]
    InvalidCursor,
    #[error("Invalid URL")]
    Url,
    #[error("Invalid image: {0}")]
    Image(#[from] ImageRefError),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
    #[error(transparent)]
    Gateway(anyhow::Error),
}

impl From<psdb_entities::url::ParseError> for Error {
    fn from(_: psdb_entities::url::ParseError) -> Self {
        Self::Url
    }
}

impl From<PageCursorDecodingError> for Error {
    fn from(_: PageCursorDecodingError) -> Self {
        Self::InvalidCursor
    }
}

impl From<CommentInvalidation> for Error {
    fn from(err: CommentInvalidation) -> Self {
        match err {
            CommentInvalidation::Empty => Self::EmptyComment,
            CommentInvalidation::TooLong => Self::CommentTooLong,
        }
    }
}
