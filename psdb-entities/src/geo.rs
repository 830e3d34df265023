use std::{cmp::Ordering, fmt, str::FromStr};

use itertools::Itertools;
use thiserror::Error;

pub type RawCoord = i32;

// Assumption: 2-complement binary representation
const RAW_COORD_INVALID: RawCoord = RawCoord::MIN;
const RAW_COORD_MAX: RawCoord = RawCoord::MAX;
const RAW_COORD_MIN: RawCoord = -RAW_COORD_MAX;

macro_rules! fixed_point_coord {
    ($(#[$attr:meta])* $name:ident, $deg_max:literal) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(RawCoord);

        impl $name {
            const DEG_MAX: f64 = $deg_max;
            const DEG_MIN: f64 = -$deg_max;
            const RAW_PER_DEG: f64 = RAW_COORD_MAX as f64 / $deg_max;

            pub const fn max() -> Self {
                Self(RAW_COORD_MAX)
            }

            pub const fn min() -> Self {
                Self(RAW_COORD_MIN)
            }

            pub const fn to_raw(self) -> RawCoord {
                self.0
            }

            pub const fn from_raw(raw: RawCoord) -> Self {
                Self(raw)
            }

            pub const fn is_valid(self) -> bool {
                self.0 != RAW_COORD_INVALID
            }

            pub fn to_deg(self) -> f64 {
                if !self.is_valid() {
                    return f64::NAN;
                }
                let deg = f64::from(self.0) / Self::RAW_PER_DEG;
                debug_assert!((Self::DEG_MIN..=Self::DEG_MAX).contains(&deg));
                deg
            }

            pub fn to_rad(self) -> f64 {
                self.to_deg().to_radians()
            }

            pub fn from_deg<T: Into<f64>>(deg: T) -> Self {
                let deg = deg.into();
                debug_assert!((Self::DEG_MIN..=Self::DEG_MAX).contains(&deg));
                let res = Self((deg * Self::RAW_PER_DEG).round() as RawCoord);
                debug_assert!(res.is_valid());
                res
            }

            pub fn try_from_deg<T: Into<f64>>(deg: T) -> Option<Self> {
                let deg = deg.into();
                // NaN is never contained
                (Self::DEG_MIN..=Self::DEG_MAX)
                    .contains(&deg)
                    .then(|| Self::from_deg(deg))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self(RAW_COORD_INVALID)
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                if self == other {
                    Some(Ordering::Equal)
                } else if self.is_valid() && other.is_valid() {
                    Some(self.0.cmp(&other.0))
                } else {
                    None
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.to_deg())
            }
        }
    };
}

fixed_point_coord!(
    /// Latitude in the range [-90, 90] degrees as compact fixed-point integer.
    LatCoord,
    90.0
);

fixed_point_coord!(
    /// Longitude in the range [-180, 180] degrees as compact fixed-point integer.
    LngCoord,
    180.0
);

/// Compact internal representation of a geographical location on a (flat) map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MapPoint {
    lat: LatCoord,
    lng: LngCoord,
}

impl MapPoint {
    pub const fn new(lat: LatCoord, lng: LngCoord) -> Self {
        Self { lat, lng }
    }

    pub const fn lat(self) -> LatCoord {
        self.lat
    }

    pub const fn lng(self) -> LngCoord {
        self.lng
    }

    pub const fn is_valid(self) -> bool {
        self.lat.is_valid() && self.lng.is_valid()
    }

    pub fn to_lat_lng_rad(self) -> (f64, f64) {
        (self.lat.to_rad(), self.lng.to_rad())
    }

    pub fn to_lat_lng_deg(self) -> (f64, f64) {
        (self.lat.to_deg(), self.lng.to_deg())
    }

    pub fn from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(lat: LAT, lng: LNG) -> Self {
        Self::new(LatCoord::from_deg(lat), LngCoord::from_deg(lng))
    }

    pub fn try_from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(
        lat: LAT,
        lng: LNG,
    ) -> Option<Self> {
        match (LatCoord::try_from_deg(lat), LngCoord::try_from_deg(lng)) {
            (Some(lat), Some(lng)) => Some(Self::new(lat, lng)),
            _ => None,
        }
    }

    fn parse_lat_lng_deg(lat_deg_str: &str, lng_deg_str: &str) -> Result<Self, MapPointParseError> {
        let lat_deg = lat_deg_str
            .trim()
            .parse::<f64>()
            .map_err(|_| MapPointParseError::Latitude(lat_deg_str.to_owned()))?;
        let lng_deg = lng_deg_str
            .trim()
            .parse::<f64>()
            .map_err(|_| MapPointParseError::Longitude(lng_deg_str.to_owned()))?;
        let lat = LatCoord::try_from_deg(lat_deg)
            .ok_or_else(|| MapPointParseError::Latitude(lat_deg_str.to_owned()))?;
        let lng = LngCoord::try_from_deg(lng_deg)
            .ok_or_else(|| MapPointParseError::Longitude(lng_deg_str.to_owned()))?;
        Ok(Self::new(lat, lng))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapPointParseError {
    #[error("Invalid latitude degrees: {0}")]
    Latitude(String),
    #[error("Invalid longitude degrees: {0}")]
    Longitude(String),
    #[error("Expected 'lat,lng' but got '{0}'")]
    Format(String),
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for MapPoint {
    type Err = MapPointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat_deg_str, lng_deg_str) = s
            .split(',')
            .collect_tuple()
            .ok_or_else(|| MapPointParseError::Format(s.to_owned()))?;
        Self::parse_lat_lng_deg(lat_deg_str, lng_deg_str)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Distance(pub f64);

impl Distance {
    pub const fn infinite() -> Self {
        Self(f64::INFINITY)
    }

    pub const fn from_meters(meters: f64) -> Self {
        Self(meters)
    }

    pub const fn to_meters(self) -> f64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0 >= 0.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.0} m", self.0)
    }
}

pub const MEAN_EARTH_RADIUS: Distance = Distance::from_meters(6_371_200.0);

impl MapPoint {
    /// Calculate the great-circle distance on the surface
    /// of the earth using a special case of the Vincenty
    /// formula for numerical accuracy.
    /// Reference: <https://en.wikipedia.org/wiki/Great-circle_distance>
    pub fn distance(p1: MapPoint, p2: MapPoint) -> Option<Distance> {
        if !p1.is_valid() || !p2.is_valid() {
            return None;
        }

        let (lat1_rad, lng1_rad) = p1.to_lat_lng_rad();
        let (lat2_rad, lng2_rad) = p2.to_lat_lng_rad();

        let (lat1_sin, lat1_cos) = lat1_rad.sin_cos();
        let (lat2_sin, lat2_cos) = lat2_rad.sin_cos();

        let (dlng_sin, dlng_cos) = (lng1_rad - lng2_rad).abs().sin_cos();

        let nom1 = lat2_cos * dlng_sin;
        let nom2 = lat1_cos * lat2_sin - lat1_sin * lat2_cos * dlng_cos;

        let nom = nom1.hypot(nom2);
        let denom = lat1_sin * lat2_sin + lat1_cos * lat2_cos * dlng_cos;

        Some(Distance::from_meters(
            MEAN_EARTH_RADIUS.to_meters() * nom.atan2(denom),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latitude() {
        assert!(!LatCoord::default().is_valid());
        assert!(LatCoord::default().to_deg().is_nan());
        assert_eq!(0.0, LatCoord::from_raw(0).to_deg());
        assert_eq!(RAW_COORD_MIN, LatCoord::min().to_raw());
        assert_eq!(RAW_COORD_MAX, LatCoord::max().to_raw());
        assert_eq!(LatCoord::min(), LatCoord::from_deg(-90));
        assert_eq!(LatCoord::max(), LatCoord::from_deg(90));
        assert_eq!(
            LatCoord::max(),
            LatCoord::from_deg(LatCoord::max().to_deg())
        );
        assert_eq!(None, LatCoord::try_from_deg(-90.000001));
        assert_eq!(None, LatCoord::try_from_deg(90.000001));
        assert_eq!(None, LatCoord::try_from_deg(f64::NAN));
    }

    #[test]
    fn longitude() {
        assert!(!LngCoord::default().is_valid());
        assert!(LngCoord::min().is_valid());
        assert!(LngCoord::max().is_valid());
        assert_eq!(LngCoord::min(), LngCoord::from_deg(-180));
        assert_eq!(LngCoord::max(), LngCoord::from_deg(180));
        assert_eq!(None, LngCoord::try_from_deg(-180.000001));
        assert_eq!(None, LngCoord::try_from_deg(180.000001));
    }

    #[test]
    fn invalid_coords_are_not_comparable() {
        assert_eq!(None, LatCoord::default().partial_cmp(&LatCoord::from_deg(1)));
        assert!(LatCoord::from_deg(1) < LatCoord::from_deg(2));
    }

    #[test]
    fn parse_map_point() {
        let pt: MapPoint = "32.0853, 34.7818".parse().unwrap();
        let (lat, lng) = pt.to_lat_lng_deg();
        assert!((lat - 32.0853).abs() < 1e-6);
        assert!((lng - 34.7818).abs() < 1e-6);
        assert!(matches!(
            "32.0853".parse::<MapPoint>(),
            Err(MapPointParseError::Format(_))
        ));
        assert!(matches!(
            "91,0".parse::<MapPoint>(),
            Err(MapPointParseError::Latitude(_))
        ));
        assert!(matches!(
            "0,x".parse::<MapPoint>(),
            Err(MapPointParseError::Longitude(_))
        ));
    }

    #[test]
    fn no_distance() {
        let p1 = MapPoint::from_lat_lng_deg(0.0, 0.0);
        assert_eq!(MapPoint::distance(p1, p1).unwrap().to_meters(), 0.0);

        let p1 = MapPoint::from_lat_lng_deg(-15.0, -180.0);
        let p2 = MapPoint::from_lat_lng_deg(-15.0, 180.0);
        assert!(MapPoint::distance(p1, p2).unwrap().to_meters() < 0.000001);
    }

    #[test]
    fn real_distance() {
        let stuttgart = MapPoint::from_lat_lng_deg(48.7755, 9.1827);
        let mannheim = MapPoint::from_lat_lng_deg(49.4836, 8.4630);
        assert!(MapPoint::distance(stuttgart, mannheim).unwrap() > Distance::from_meters(94_000.0));
        assert!(MapPoint::distance(stuttgart, mannheim).unwrap() < Distance::from_meters(95_000.0));

        let dizengoff = MapPoint::from_lat_lng_deg(32.0853, 34.7818);
        let nearby = MapPoint::from_lat_lng_deg(32.0855, 34.7820);
        let d = MapPoint::distance(dizengoff, nearby).unwrap().to_meters();
        assert!(d > 25.0 && d < 35.0);
    }

    #[test]
    fn symmetric_distance() {
        let a = MapPoint::from_lat_lng_deg(80.0, 0.0);
        let b = MapPoint::from_lat_lng_deg(90.0, 20.0);
        assert_eq!(
            MapPoint::distance(a, b).unwrap(),
            MapPoint::distance(b, a).unwrap()
        );
    }

    #[test]
    fn distance_with_invalid_coordinates() {
        let a = MapPoint::new(LatCoord::from_deg(10.0), Default::default());
        let b = MapPoint::from_lat_lng_deg(20.0, 20.0);
        assert_eq!(None, MapPoint::distance(a, b));
    }
}
