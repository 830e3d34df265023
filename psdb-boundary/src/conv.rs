use super::*;
use e::{cursor::PageCursor, url::Url};
use psdb_entities as e;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Invalid map link: {0}")]
    MapLink(#[from] e::url::ParseError),
}

impl From<e::space::SpaceType> for SpaceType {
    fn from(from: e::space::SpaceType) -> Self {
        use e::space::SpaceType as E;
        match from {
            E::PublicShelter => Self::PublicShelter,
            E::BuildingShelter => Self::BuildingShelter,
            E::Stairwell => Self::Stairwell,
            E::Parking => Self::Parking,
            E::Other => Self::Other,
        }
    }
}

impl From<SpaceType> for e::space::SpaceType {
    fn from(from: SpaceType) -> Self {
        use SpaceType as B;
        match from {
            B::PublicShelter => Self::PublicShelter,
            B::BuildingShelter => Self::BuildingShelter,
            B::Stairwell => Self::Stairwell,
            B::Parking => Self::Parking,
            B::Other => Self::Other,
        }
    }
}

impl From<e::geo::MapPoint> for Coordinate {
    fn from(from: e::geo::MapPoint) -> Self {
        let (lat, lng) = from.to_lat_lng_deg();
        Self { lat, lng }
    }
}

impl From<e::address::Address> for Address {
    fn from(from: e::address::Address) -> Self {
        let e::address::Address {
            street,
            number,
            city,
            map_link,
        } = from;
        Self {
            street,
            number,
            city,
            map_link: map_link.map(String::from),
        }
    }
}

impl TryFrom<Address> for e::address::Address {
    type Error = ConversionError;

    fn try_from(from: Address) -> Result<Self, Self::Error> {
        let Address {
            street,
            number,
            city,
            map_link,
        } = from;
        let map_link = map_link.as_deref().map(Url::parse).transpose()?;
        Ok(Self {
            street,
            number,
            city,
            map_link,
        })
    }
}

impl From<e::user::UserRef> for UserRef {
    fn from(from: e::user::UserRef) -> Self {
        let e::user::UserRef { id, display_name } = from;
        Self {
            id: id.into(),
            display_name,
        }
    }
}

impl From<UserRef> for e::user::UserRef {
    fn from(from: UserRef) -> Self {
        let UserRef { id, display_name } = from;
        Self {
            id: id.into(),
            display_name,
        }
    }
}

impl From<e::space::Space> for Space {
    fn from(from: e::space::Space) -> Self {
        let e::space::Space {
            id,
            space_type,
            address,
            pos,
            geohash,
            description,
            images,
            created,
        } = from;
        Self {
            id: id.into(),
            space_type: space_type.into(),
            address: address.into(),
            coordinate: pos.into(),
            geohash: geohash.as_str().to_owned(),
            description,
            images: images.into_iter().map(|img| img.to_string()).collect(),
            created_at: created.at.as_millis(),
            created_by: created.by.into(),
        }
    }
}

impl From<(e::space::Space, e::geo::Distance)> for NearbySpace {
    fn from((space, distance): (e::space::Space, e::geo::Distance)) -> Self {
        Self {
            space: space.into(),
            distance: distance.to_meters(),
        }
    }
}

impl From<e::comment::Comment> for Comment {
    fn from(from: e::comment::Comment) -> Self {
        let e::comment::Comment {
            id,
            space_id,
            text,
            created,
        } = from;
        Self {
            id: id.into(),
            space_id: space_id.into(),
            text,
            created_at: created.at.as_millis(),
            created_by: created.by.into(),
        }
    }
}

impl From<e::user::UserSpace> for UserSpace {
    fn from(from: e::user::UserSpace) -> Self {
        let e::user::UserSpace {
            id,
            address,
            created_at,
        } = from;
        Self {
            id: id.into(),
            address: address.into(),
            created_at: created_at.as_millis(),
        }
    }
}

impl TryFrom<UserSpace> for e::user::UserSpace {
    type Error = ConversionError;

    fn try_from(from: UserSpace) -> Result<Self, Self::Error> {
        let UserSpace {
            id,
            address,
            created_at,
        } = from;
        Ok(Self {
            id: id.into(),
            address: address.try_into()?,
            created_at: e::time::TimestampMs::from_millis(created_at),
        })
    }
}

impl<T> Page<T> {
    pub fn from_entities<E>(items: impl IntoIterator<Item = E>, next: Option<&PageCursor>) -> Self
    where
        E: Into<T>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            next: next.map(PageCursor::encode_to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use e::builders::*;

    #[test]
    fn serialize_space_type_as_kebab_case() {
        let json =
            serde_json::to_string(&SpaceType::from(e::space::SpaceType::PublicShelter)).unwrap();
        assert_eq!("\"public-shelter\"", json);
    }

    #[test]
    fn nearby_space_is_flattened() {
        let space = e::space::Space::build()
            .id("tel-aviv-dizengoff-50")
            .pos(e::geo::MapPoint::from_lat_lng_deg(32.0855, 34.782))
            .image("door.jpg")
            .finish();
        let nearby = NearbySpace::from((space, e::geo::Distance::from_meters(27.5)));
        let json = serde_json::to_value(&nearby).unwrap();
        assert_eq!("tel-aviv-dizengoff-50", json["id"]);
        assert_eq!(27.5, json["distance"]);
        assert_eq!("images/tel-aviv-dizengoff-50/door.jpg", json["images"][0]);
    }

    #[test]
    fn user_space_with_invalid_map_link() {
        let user_space = UserSpace {
            id: "a".into(),
            address: Address {
                street: "Herzl".into(),
                number: "1".into(),
                city: "Haifa".into(),
                map_link: Some("not a url".into()),
            },
            created_at: 0,
        };
        assert!(e::user::UserSpace::try_from(user_space.clone()).is_err());
        let user_space = UserSpace {
            address: Address {
                map_link: Some("https://maps.example.com/?q=haifa".into()),
                ..user_space.address
            },
            ..user_space
        };
        let converted = e::user::UserSpace::try_from(user_space.clone()).unwrap();
        assert_eq!(user_space, UserSpace::from(converted));
    }

    #[test]
    fn page_without_next_cursor_omits_field() {
        let page = Page::<Comment>::from_entities(Vec::<e::comment::Comment>::new(), None);
        assert_eq!(r#"{"items":[]}"#, serde_json::to_string(&page).unwrap());
    }
}
