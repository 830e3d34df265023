use psdb_entities::{comment::Comment, space::Space};
use thiserror::Error;

pub const MAX_DESCRIPTION_LEN: usize = 1_000;
pub const MAX_COMMENT_LEN: usize = 1_000;

pub trait Validate {
    type Error;
    fn validate(&self) -> Result<(), Self::Error>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpaceInvalidation {
    #[error("Missing street")]
    Street,
    #[error("Missing house number")]
    Number,
    #[error("Missing city")]
    City,
    #[error("Invalid position")]
    Position,
    #[error("The description exceeds {MAX_DESCRIPTION_LEN} characters")]
    Description,
}

impl Validate for Space {
    type Error = SpaceInvalidation;
    fn validate(&self) -> Result<(), Self::Error> {
        let addr = &self.address;
        if addr.street.trim().is_empty() {
            return Err(SpaceInvalidation::Street);
        }
        if addr.number.trim().is_empty() {
            return Err(SpaceInvalidation::Number);
        }
        if addr.city.trim().is_empty() {
            return Err(SpaceInvalidation::City);
        }
        if !self.pos.is_valid() {
            return Err(SpaceInvalidation::Position);
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(SpaceInvalidation::Description);
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommentInvalidation {
    #[error("Empty comment")]
    Empty,
    #[error("The comment exceeds {MAX_COMMENT_LEN} characters")]
    TooLong,
}

impl Validate for Comment {
    type Error = CommentInvalidation;
    fn validate(&self) -> Result<(), Self::Error> {
        if self.text.trim().is_empty() {
            return Err(CommentInvalidation::Empty);
        }
        if self.text.chars().count() > MAX_COMMENT_LEN {
            return Err(CommentInvalidation::TooLong);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psdb_entities::{builders::*, geo::*};

    #[test]
    fn validate_space_address() {
        let space = Space::build()
            .address("Dizengoff", "50", "Tel Aviv")
            .finish();
        assert_eq!(Ok(()), space.validate());
        let space = Space::build().address(" ", "50", "Tel Aviv").finish();
        assert_eq!(Err(SpaceInvalidation::Street), space.validate());
        let space = Space::build().address("Dizengoff", "", "Tel Aviv").finish();
        assert_eq!(Err(SpaceInvalidation::Number), space.validate());
        let space = Space::build().address("Dizengoff", "50", "").finish();
        assert_eq!(Err(SpaceInvalidation::City), space.validate());
    }

    #[test]
    fn validate_space_position_and_description() {
        let mut space = Space::build()
            .address("Dizengoff", "50", "Tel Aviv")
            .finish();
        space.pos = MapPoint::default();
        assert_eq!(Err(SpaceInvalidation::Position), space.validate());
        let space = Space::build()
            .address("Dizengoff", "50", "Tel Aviv")
            .description(&"x".repeat(MAX_DESCRIPTION_LEN + 1))
            .finish();
        assert_eq!(Err(SpaceInvalidation::Description), space.validate());
    }

    #[test]
    fn validate_comment() {
        assert_eq!(Ok(()), Comment::build().text("dry").finish().validate());
        assert_eq!(
            Err(CommentInvalidation::Empty),
            Comment::build().text(" \n").finish().validate()
        );
        assert_eq!(
            Err(CommentInvalidation::TooLong),
            Comment::build()
                .text(&"x".repeat(MAX_COMMENT_LEN + 1))
                .finish()
                .validate()
        );
    }
}
