use super::prelude::*;
use crate::{
    gateways::geocode::GeoCodingGateway,
    repositories::Error as RepoError,
    util::{
        address::derive_space_id,
        validate::{SpaceInvalidation, Validate},
    },
};

#[rustfmt::skip]
#[derive(Debug, Clone, Default)]
pub struct NewSpace {
    pub space_type  : SpaceType,
    pub street      : String,
    pub number      : String,
    pub city        : String,
    pub map_link    : Option<String>,
    pub lat         : Option<f64>,
    pub lng         : Option<f64>,
    pub description : String,
}

#[derive(Debug, Clone)]
pub struct Storable(Space);

impl Storable {
    pub fn space_id(&self) -> &Id {
        &self.0.id
    }
}

fn resolve_position(
    geocoder: Option<&dyn GeoCodingGateway>,
    lat: Option<f64>,
    lng: Option<f64>,
    address: &Address,
) -> Result<MapPoint> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            MapPoint::try_from_lat_lng_deg(lat, lng).ok_or(Error::InvalidPosition)
        }
        (None, None) => {
            let (lat, lng) = geocoder
                .and_then(|gw| gw.resolve_address_lat_lng(address))
                .ok_or(Error::InvalidPosition)?;
            log::debug!("Resolved position of '{address}': {lat},{lng}");
            MapPoint::try_from_lat_lng_deg(lat, lng).ok_or(Error::InvalidPosition)
        }
        _ => Err(Error::InvalidPosition),
    }
}

pub fn prepare_new_space(
    geocoder: Option<&dyn GeoCodingGateway>,
    new_space: NewSpace,
    created_by: Option<&UserRef>,
) -> Result<Storable> {
    let created_by = super::signed_in(created_by)?;
    let NewSpace {
        space_type,
        street,
        number,
        city,
        map_link,
        lat,
        lng,
        description,
    } = new_space;
    let map_link = map_link
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Url::parse)
        .transpose()?;
    let address = Address {
        street: street.trim().to_owned(),
        number: number.trim().to_owned(),
        city: city.trim().to_owned(),
        map_link,
    };
    let id = derive_space_id(&address);
    if !id.is_valid() {
        return Err(SpaceInvalidation::Street.into());
    }
    let pos = resolve_position(geocoder, lat, lng, &address)?;
    let space = Space {
        id,
        space_type,
        geohash: Geohash::encode(pos, DEFAULT_PRECISION),
        pos,
        address,
        description: description.trim().to_owned(),
        images: vec![],
        created: Activity::now(created_by.clone()),
    };
    space.validate()?;
    Ok(Storable(space))
}

pub fn store_new_space<R: SpaceRepo>(repo: &R, s: Storable) -> Result<Space> {
    let Storable(space) = s;
    log::debug!("Storing new space: {:?}", space);
    repo.create_space_if_absent(&space).map_err(|err| match err {
        RepoError::AlreadyExists => Error::DuplicateAddress(space.id.clone()),
        err => Error::Repo(err),
    })?;
    Ok(space)
}
