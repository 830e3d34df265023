use std::{fmt, str::FromStr};

use num_derive::{FromPrimitive, ToPrimitive};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::{activity::*, address::*, cursor::*, geo::*, geohash::*, id::*, user::*};

/// Category of a protected space.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SpaceType {
    PublicShelter   = 0,
    BuildingShelter = 1,
    Stairwell       = 2,
    Parking         = 3,
    Other           = 4,
}

pub type SpaceTypePrimitive = i16;

impl Default for SpaceType {
    fn default() -> Self {
        Self::Other
    }
}

/// Reference to an image in the file store.
///
/// All images of a space share the common prefix `images/<space-id>/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(String);

const IMAGES_ROOT: &str = "images";

impl ImageRef {
    pub fn new(space_id: &Id, file_name: &str) -> Result<Self, ImageRefError> {
        if !is_valid_file_name(file_name) {
            return Err(ImageRefError::FileName);
        }
        if !space_id.is_valid() || space_id.as_str().contains('/') {
            return Err(ImageRefError::SpaceId);
        }
        Ok(Self(format!("{}{}", Self::space_prefix(space_id), file_name)))
    }

    /// The common path prefix of all images of a space.
    pub fn space_prefix(space_id: &Id) -> String {
        format!("{IMAGES_ROOT}/{space_id}/")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    pub fn belongs_to(&self, space_id: &Id) -> bool {
        self.0.starts_with(&Self::space_prefix(space_id))
    }
}

fn is_valid_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && file_name != "."
        && file_name != ".."
        && !file_name.contains(['/', '\\', ':'])
        && !file_name.chars().any(char::is_control)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageRefError {
    #[error("Invalid image file name")]
    FileName,
    #[error("Invalid space id")]
    SpaceId,
    #[error("Invalid image path")]
    Path,
}

impl FromStr for ImageRef {
    type Err = ImageRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split('/');
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(IMAGES_ROOT), Some(space_id), Some(file_name), None) => {
                Self::new(&space_id.into(), file_name).map_err(|_| ImageRefError::Path)
            }
            _ => Err(ImageRefError::Path),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user-submitted protected space, e.g. a bomb shelter or a stairwell.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    pub id          : Id,
    pub space_type  : SpaceType,
    pub address     : Address,
    pub pos         : MapPoint,
    pub geohash     : Geohash,
    pub description : String,
    pub images      : Vec<ImageRef>,
    pub created     : Activity,
}

impl Space {
    pub fn is_created_by(&self, user_id: &Id) -> bool {
        &self.created.by.id == user_id
    }

    pub fn cursor(&self) -> PageCursor {
        PageCursor {
            created_at: self.created.at,
            id: self.id.clone(),
        }
    }
}

impl From<&Space> for UserSpace {
    fn from(from: &Space) -> Self {
        Self {
            id: from.id.clone(),
            address: from.address.clone(),
            created_at: from.created.at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{FromPrimitive, ToPrimitive};
    use strum::IntoEnumIterator;

    #[test]
    fn space_type_names() {
        assert_eq!("public-shelter", SpaceType::PublicShelter.to_string());
        assert_eq!(Ok(SpaceType::Stairwell), "stairwell".parse());
        assert!("bunker".parse::<SpaceType>().is_err());
    }

    #[test]
    fn space_type_primitives() {
        for space_type in SpaceType::iter() {
            let primitive = space_type.to_i16().unwrap();
            assert_eq!(Some(space_type), SpaceType::from_i16(primitive));
        }
        assert_eq!(None, SpaceType::from_i16(5));
    }

    #[test]
    fn image_refs() {
        let space_id = Id::from("tel-aviv-dizengoff-50");
        let img = ImageRef::new(&space_id, "door.jpg").unwrap();
        assert_eq!("images/tel-aviv-dizengoff-50/door.jpg", img.as_str());
        assert_eq!("door.jpg", img.file_name());
        assert!(img.belongs_to(&space_id));
        assert!(!img.belongs_to(&"tel-aviv-dizengoff-5".into()));
        assert_eq!(Ok(img.clone()), img.as_str().parse());
    }

    #[test]
    fn reject_invalid_image_refs() {
        let space_id = Id::from("abc");
        assert_eq!(Err(ImageRefError::FileName), ImageRef::new(&space_id, ""));
        assert_eq!(Err(ImageRefError::FileName), ImageRef::new(&space_id, ".."));
        assert_eq!(
            Err(ImageRefError::FileName),
            ImageRef::new(&space_id, "a/b.png")
        );
        assert_eq!(
            Err(ImageRefError::FileName),
            ImageRef::new(&space_id, "a:b.png")
        );
        assert_eq!(
            Err(ImageRefError::SpaceId),
            ImageRef::new(&Id::default(), "a.png")
        );
        assert!("images/abc".parse::<ImageRef>().is_err());
        assert!("videos/abc/a.png".parse::<ImageRef>().is_err());
        assert!("images/abc/x/a.png".parse::<ImageRef>().is_err());
    }
}
