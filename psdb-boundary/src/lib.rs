use serde::{Deserialize, Serialize};

#[cfg(feature = "entity-conversions")]
mod conv;

#[cfg(feature = "entity-conversions")]
pub use conv::ConversionError;

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq))]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(
    feature = "extra-derive",
    derive(Debug, Clone, Copy, PartialEq, Eq, Hash)
)]
#[serde(rename_all = "kebab-case")]
pub enum SpaceType {
    PublicShelter,
    BuildingShelter,
    Stairwell,
    Parking,
    Other,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct Address {
    pub street: String,
    pub number: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub map_link: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct UserRef {
    pub id: String,
    pub display_name: String,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Space {
    pub id          : String,
    pub space_type  : SpaceType,
    pub address     : Address,
    pub coordinate  : Coordinate,
    pub geohash     : String,
    pub description : String,
    pub images      : Vec<String>,
    pub created_at  : i64,
    pub created_by  : UserRef,
}

/// A space together with its distance from the search center.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct NearbySpace {
    #[serde(flatten)]
    pub space: Space,
    /// Great-circle distance in meters
    pub distance: f64,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct Comment {
    pub id: String,
    pub space_id: String,
    pub text: String,
    pub created_at: i64,
    pub created_by: UserRef,
}

/// Record of a space created by the signed-in user,
/// persisted on the device.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct UserSpace {
    pub id: String,
    pub address: Address,
    pub created_at: i64,
}

/// A single page of a cursor-paginated list.
///
/// `next` is the encoded cursor for requesting the following
/// page and is missing when the end of the list has been reached.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next: Option<String>,
}
