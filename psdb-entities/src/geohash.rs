//! Geohash encoding and proximity range queries.
//!
//! A geohash interleaves the bits of a bisected longitude and latitude
//! and encodes them in base 32. Nearby locations share common prefixes,
//! which allows to find all locations within a circle by scanning a few
//! lexicographic ranges of an index that is ordered by geohash.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::geo::{Distance, MapPoint};

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

const BITS_PER_CHAR: u32 = 5;

pub const MAX_PRECISION: usize = 22;

pub const DEFAULT_PRECISION: usize = 10;

// Closes a range after the last base 32 character.
const RANGE_END_SUFFIX: char = '~';

const EARTH_MERI_CIRCUMFERENCE: f64 = 40_007_860.0;
const EARTH_EQ_RADIUS: f64 = 6_378_137.0;
const EARTH_E2: f64 = 0.006_694_478_197_99;
const METERS_PER_DEGREE_LATITUDE: f64 = 110_574.0;
const EPSILON: f64 = 1e-12;

// Bounding boxes are computed on the WGS84 ellipsoid while exact
// distances use a mean sphere.
const RADIUS_TOLERANCE: f64 = 1.01;

// Cells of 22.5 degrees latitude around a pole need 8 ranges each.
const POLAR_LATITUDE_BITS: i32 = 3;

/// Base 32 geohash of a location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Geohash(String);

impl Geohash {
    /// Encode a valid location with the given number of characters.
    ///
    /// The precision is clamped into the range `1..=MAX_PRECISION`.
    pub fn encode(pos: MapPoint, precision: usize) -> Self {
        debug_assert!(pos.is_valid());
        let (lat, lng) = pos.to_lat_lng_deg();
        Self(encode_lat_lng_deg(
            lat,
            lng,
            precision.clamp(1, MAX_PRECISION),
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn encode_lat_lng_deg(lat: f64, lng: f64, precision: usize) -> String {
    let mut lat_range = (-90.0, 90.0);
    let mut lng_range = (-180.0, 180.0);
    let mut hash = String::with_capacity(precision);
    let mut value = 0usize;
    let mut bits = 0;
    let mut even = true;
    while hash.len() < precision {
        let (coord, range) = if even {
            (lng, &mut lng_range)
        } else {
            (lat, &mut lat_range)
        };
        let mid = (range.0 + range.1) / 2.0;
        value <<= 1;
        if coord > mid {
            value += 1;
            range.0 = mid;
        } else {
            range.1 = mid;
        }
        even = !even;
        if bits < BITS_PER_CHAR - 1 {
            bits += 1;
        } else {
            bits = 0;
            hash.push(char::from(BASE32[value]));
            value = 0;
        }
    }
    hash
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeohashParseError {
    #[error("Empty geohash")]
    Empty,
    #[error("Geohash exceeds {MAX_PRECISION} characters")]
    TooLong,
    #[error("Invalid geohash character '{0}'")]
    InvalidChar(char),
}

impl FromStr for Geohash {
    type Err = GeohashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(GeohashParseError::Empty);
        }
        if let Some(c) = s.chars().find(|c| !c.is_ascii() || !BASE32.contains(&(*c as u8))) {
            return Err(GeohashParseError::InvalidChar(c));
        }
        if s.len() > MAX_PRECISION {
            return Err(GeohashParseError::TooLong);
        }
        Ok(Self(s.to_owned()))
    }
}

impl fmt::Display for Geohash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive lexicographic range of geohashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeohashRange {
    pub start: String,
    pub end: String,
}

impl GeohashRange {
    pub fn contains(&self, hash: &str) -> bool {
        self.start.as_str() <= hash && hash <= self.end.as_str()
    }
}

impl fmt::Display for GeohashRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Compute the ranges of geohashes that cover a circle.
///
/// Every location within `radius` around `center` has a geohash that
/// is contained in at least one of the returned ranges. The ranges are
/// a superset, i.e. the exact distance needs to be checked afterwards.
/// Stored geohashes are expected to have [`DEFAULT_PRECISION`].
pub fn query_bounds(center: MapPoint, radius: Distance) -> Vec<GeohashRange> {
    debug_assert!(center.is_valid());
    debug_assert!(radius.is_valid());
    let radius = radius.to_meters() * RADIUS_TOLERANCE;
    if covers_all_longitudes(center, radius) {
        return polar_query_bounds(center, radius);
    }
    let max_bits = DEFAULT_PRECISION as i32 * BITS_PER_CHAR as i32;
    let query_bits = bounding_box_bits(center, radius).min(max_bits).max(1) as u32;
    let precision = query_bits.div_ceil(BITS_PER_CHAR) as usize;
    let mut ranges: Vec<GeohashRange> = Vec::with_capacity(9);
    for (lat, lng) in bounding_box_coordinates(center, radius) {
        let hash = encode_lat_lng_deg(lat, lng, precision);
        let range = geohash_range(&hash, query_bits);
        if !ranges.contains(&range) {
            ranges.push(range);
        }
    }
    ranges
}

/// The circle reaches a pole or wraps around the whole parallel.
fn covers_all_longitudes(center: MapPoint, radius: f64) -> bool {
    let (lat, _) = center.to_lat_lng_deg();
    let (north, south) = north_south_latitudes(lat, radius);
    north >= 90.0
        || south <= -90.0
        || bounding_box_longitude_degrees(north, south, radius) >= 180.0
}

/// Cover the latitude band of the circle with cells around the globe.
///
/// A geohash prefix with `n` latitude bits also fixes `n` longitude
/// bits, so every latitude cell needs `2^n` ranges.
fn polar_query_bounds(center: MapPoint, radius: f64) -> Vec<GeohashRange> {
    let lat_bits =
        (latitude_bits_for_resolution(radius).floor() as i32).clamp(0, POLAR_LATITUDE_BITS);
    if lat_bits == 0 {
        return vec![GeohashRange {
            start: char::from(BASE32[0]).to_string(),
            end: RANGE_END_SUFFIX.to_string(),
        }];
    }
    let query_bits = lat_bits as u32 * 2;
    let precision = query_bits.div_ceil(BITS_PER_CHAR) as usize;
    let (lat, _) = center.to_lat_lng_deg();
    let (north, south) = north_south_latitudes(lat, radius);
    let lng_cells = 1u32 << lat_bits;
    let lng_cell_width = 360.0 / f64::from(lng_cells);
    let mut ranges = Vec::with_capacity(lng_cells as usize * 3);
    for cell in 0..lng_cells {
        let cell_lng = -180.0 + (f64::from(cell) + 0.5) * lng_cell_width;
        for cell_lat in [north, lat, south] {
            let hash = encode_lat_lng_deg(cell_lat, cell_lng, precision);
            let range = geohash_range(&hash, query_bits);
            if !ranges.contains(&range) {
                ranges.push(range);
            }
        }
    }
    ranges
}

fn geohash_range(hash: &str, bits: u32) -> GeohashRange {
    let precision = bits.div_ceil(BITS_PER_CHAR) as usize;
    if hash.len() < precision {
        return GeohashRange {
            start: hash.to_owned(),
            end: format!("{hash}{RANGE_END_SUFFIX}"),
        };
    }
    let hash = &hash[..precision];
    let (base, last) = hash.split_at(precision - 1);
    let last_value = last
        .bytes()
        .next()
        .and_then(|c| BASE32.iter().position(|b| *b == c))
        .unwrap_or_default();
    let significant_bits = bits - base.len() as u32 * BITS_PER_CHAR;
    let unused_bits = BITS_PER_CHAR - significant_bits;
    let start_value = (last_value >> unused_bits) << unused_bits;
    let end_value = start_value + (1 << unused_bits);
    let start = format!("{base}{}", char::from(BASE32[start_value]));
    let end = if end_value > 31 {
        format!("{base}{RANGE_END_SUFFIX}")
    } else {
        format!("{base}{}", char::from(BASE32[end_value]))
    };
    GeohashRange { start, end }
}

fn meters_to_longitude_degrees(distance: f64, lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    let num = lat_rad.cos() * EARTH_EQ_RADIUS * std::f64::consts::PI / 180.0;
    let denom = (1.0 - EARTH_E2 * lat_rad.sin() * lat_rad.sin()).sqrt();
    let delta_deg = num / denom;
    if delta_deg < EPSILON {
        if distance > 0.0 {
            360.0
        } else {
            0.0
        }
    } else {
        (distance / delta_deg).min(360.0)
    }
}

fn longitude_bits_for_resolution(resolution: f64, lat_deg: f64) -> f64 {
    let degs = meters_to_longitude_degrees(resolution, lat_deg);
    if degs.abs() > 0.000_001 {
        (360.0 / degs).log2().max(1.0)
    } else {
        1.0
    }
}

fn latitude_bits_for_resolution(resolution: f64) -> f64 {
    (EARTH_MERI_CIRCUMFERENCE / 2.0 / resolution)
        .log2()
        .min(f64::from(MAX_PRECISION as u32 * BITS_PER_CHAR))
}

fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        return lng;
    }
    let adjusted = lng + 180.0;
    if adjusted > 0.0 {
        (adjusted % 360.0) - 180.0
    } else {
        180.0 - (-adjusted % 360.0)
    }
}

fn north_south_latitudes(lat: f64, radius: f64) -> (f64, f64) {
    let delta = radius / METERS_PER_DEGREE_LATITUDE;
    ((lat + delta).min(90.0), (lat - delta).max(-90.0))
}

fn bounding_box_longitude_degrees(north: f64, south: f64, radius: f64) -> f64 {
    meters_to_longitude_degrees(radius, north).max(meters_to_longitude_degrees(radius, south))
}

fn bounding_box_bits(center: MapPoint, radius: f64) -> i32 {
    let (lat, _) = center.to_lat_lng_deg();
    let (north, south) = north_south_latitudes(lat, radius);
    let bits_lat = latitude_bits_for_resolution(radius).floor() as i32 * 2;
    let bits_lng_north = longitude_bits_for_resolution(radius, north).floor() as i32 * 2 - 1;
    let bits_lng_south = longitude_bits_for_resolution(radius, south).floor() as i32 * 2 - 1;
    bits_lat
        .min(bits_lng_north)
        .min(bits_lng_south)
        .min((MAX_PRECISION as u32 * BITS_PER_CHAR) as i32)
}

/// The center and the eight extremal points of the bounding box.
fn bounding_box_coordinates(center: MapPoint, radius: f64) -> [(f64, f64); 9] {
    let (lat, lng) = center.to_lat_lng_deg();
    let (north, south) = north_south_latitudes(lat, radius);
    let lng_degs = bounding_box_longitude_degrees(north, south, radius);
    let west = wrap_longitude(lng - lng_degs);
    let east = wrap_longitude(lng + lng_degs);
    [
        (lat, lng),
        (lat, west),
        (lat, east),
        (north, lng),
        (north, west),
        (north, east),
        (south, lng),
        (south, west),
        (south, east),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn encode_well_known_locations() {
        let pos = MapPoint::from_lat_lng_deg(57.64911, 10.40744);
        assert_eq!("u4pruydqqvj", Geohash::encode(pos, 11).as_str());
        let pos = MapPoint::from_lat_lng_deg(42.6, -5.6);
        assert_eq!("ezs42", Geohash::encode(pos, 5).as_str());
    }

    #[test]
    fn encode_clamps_precision() {
        let pos = MapPoint::from_lat_lng_deg(32.0853, 34.7818);
        assert_eq!(1, Geohash::encode(pos, 0).len());
        assert_eq!(MAX_PRECISION, Geohash::encode(pos, 100).len());
        let short = Geohash::encode(pos, 4);
        let long = Geohash::encode(pos, DEFAULT_PRECISION);
        assert!(long.as_str().starts_with(short.as_str()));
    }

    #[test]
    fn parse_geohash() {
        assert!("sv8wrqfm".parse::<Geohash>().is_ok());
        assert_eq!(Err(GeohashParseError::Empty), "".parse::<Geohash>());
        assert_eq!(
            Err(GeohashParseError::InvalidChar('a')),
            "sv8a".parse::<Geohash>()
        );
        assert_eq!(
            Err(GeohashParseError::TooLong),
            "0".repeat(MAX_PRECISION + 1).parse::<Geohash>()
        );
    }

    #[test]
    fn wrap_longitudes() {
        assert_eq!(10.0, wrap_longitude(10.0));
        assert_eq!(-170.0, wrap_longitude(190.0));
        assert_eq!(170.0, wrap_longitude(-190.0));
        assert_eq!(180.0, wrap_longitude(180.0));
    }

    #[test]
    fn range_of_truncated_hash() {
        // 9 bits: the full first character and 4 bits of the second
        let range = geohash_range("sv8w", 9);
        assert_eq!("su", range.start);
        assert_eq!("sw", range.end);
        let range = geohash_range("s", 10);
        assert_eq!("s", range.start);
        assert_eq!("s~", range.end);
        let range = geohash_range("zz", 8);
        assert_eq!("zw", range.start);
        assert_eq!("z~", range.end);
    }

    #[test]
    fn bounds_are_deduplicated() {
        let center = MapPoint::from_lat_lng_deg(32.0853, 34.7818);
        let ranges = query_bounds(center, Distance::from_meters(300.0));
        assert!(!ranges.is_empty());
        assert!(ranges.len() <= 9);
        for (i, a) in ranges.iter().enumerate() {
            for b in &ranges[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn bounds_of_example_around_center() {
        let center = MapPoint::from_lat_lng_deg(32.0853, 34.7818);
        let near = MapPoint::from_lat_lng_deg(32.0855, 34.7820);
        let far = MapPoint::from_lat_lng_deg(32.15, 34.90);
        let ranges = query_bounds(center, Distance::from_meters(300.0));
        let covered = |pos| {
            let hash = Geohash::encode(pos, DEFAULT_PRECISION);
            ranges.iter().any(|r| r.contains(hash.as_str()))
        };
        assert!(covered(center));
        assert!(covered(near));
        assert!(!covered(far));
    }

    #[test]
    fn bounds_without_false_negatives() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let center = MapPoint::from_lat_lng_deg(
                rng.gen_range(-70.0..70.0),
                rng.gen_range(-180.0..180.0),
            );
            let radius = Distance::from_meters(rng.gen_range(10.0..20_000.0));
            let ranges = query_bounds(center, radius);
            let (lat, lng) = center.to_lat_lng_deg();
            let lat_span = radius.to_meters() / 100_000.0;
            let lng_span = lat_span / lat.to_radians().cos();
            let mut inside = 0;
            for _ in 0..200 {
                let candidate_lat = (lat + rng.gen_range(-lat_span..lat_span)).clamp(-90.0, 90.0);
                let candidate_lng = wrap_longitude(lng + rng.gen_range(-lng_span..lng_span));
                let candidate = MapPoint::from_lat_lng_deg(candidate_lat, candidate_lng);
                if MapPoint::distance(center, candidate).unwrap() > radius {
                    continue;
                }
                inside += 1;
                let hash = Geohash::encode(candidate, DEFAULT_PRECISION);
                assert!(
                    ranges.iter().any(|r| r.contains(hash.as_str())),
                    "{candidate} ({hash}) within {radius} of {center} not covered"
                );
            }
            assert!(inside > 0);
        }
    }

    fn assert_covered(ranges: &[GeohashRange], center: MapPoint, radius: Distance, pos: MapPoint) {
        let hash = Geohash::encode(pos, DEFAULT_PRECISION);
        assert!(
            ranges.iter().any(|r| r.contains(hash.as_str())),
            "{pos} ({hash}) within {radius} of {center} not covered by {ranges:?}"
        );
    }

    #[test]
    fn bounds_around_a_pole() {
        let center = MapPoint::from_lat_lng_deg(89.999, 10.0);
        let radius = Distance::from_meters(1_000.0);
        let ranges = query_bounds(center, radius);
        let opposite = MapPoint::from_lat_lng_deg(89.999, -170.0);
        assert!(MapPoint::distance(center, opposite).unwrap() < radius);
        assert_covered(&ranges, center, radius, opposite);
        assert_covered(&ranges, center, radius, MapPoint::from_lat_lng_deg(90.0, 0.0));
        let far = Geohash::encode(MapPoint::from_lat_lng_deg(0.0, 10.0), DEFAULT_PRECISION);
        assert!(!ranges.iter().any(|r| r.contains(far.as_str())));
    }

    #[test]
    fn bounds_without_false_negatives_at_high_latitudes() {
        let mut rng = StdRng::seed_from_u64(0x90);
        let mut inside = 0;
        for i in 0..200 {
            let lat = rng.gen_range(70.0..90.0);
            let lat = if i % 2 == 0 { lat } else { -lat };
            let center = MapPoint::from_lat_lng_deg(lat, rng.gen_range(-180.0..180.0));
            let radius = Distance::from_meters(rng.gen_range(10.0..20_000.0));
            let ranges = query_bounds(center, radius);
            let lat_span = radius.to_meters() / 100_000.0;
            for _ in 0..200 {
                let candidate = MapPoint::from_lat_lng_deg(
                    (lat + rng.gen_range(-lat_span..lat_span)).clamp(-90.0, 90.0),
                    rng.gen_range(-180.0..180.0),
                );
                if MapPoint::distance(center, candidate).unwrap() > radius {
                    continue;
                }
                inside += 1;
                assert_covered(&ranges, center, radius, candidate);
            }
        }
        assert!(inside > 0);
    }

    #[test]
    fn bounds_close_to_the_poles() {
        let mut rng = StdRng::seed_from_u64(0x9090);
        for i in 0..50 {
            let lat = rng.gen_range(89.9..90.0);
            let lat = if i % 2 == 0 { lat } else { -lat };
            let center = MapPoint::from_lat_lng_deg(lat, rng.gen_range(-180.0..180.0));
            // Always reaches the pole
            let radius = Distance::from_meters(rng.gen_range(12_000.0..20_000.0));
            let ranges = query_bounds(center, radius);
            let mut inside = 0;
            for _ in 0..200 {
                let candidate_lat = if lat > 0.0 {
                    rng.gen_range(89.8..=90.0)
                } else {
                    rng.gen_range(-90.0..=-89.8)
                };
                let candidate =
                    MapPoint::from_lat_lng_deg(candidate_lat, rng.gen_range(-180.0..180.0));
                if MapPoint::distance(center, candidate).unwrap() > radius {
                    continue;
                }
                inside += 1;
                assert_covered(&ranges, center, radius, candidate);
            }
            assert!(inside > 0);
        }
    }

    #[test]
    fn bounds_near_the_antimeridian() {
        let center = MapPoint::from_lat_lng_deg(-16.5, 179.999);
        let radius = Distance::from_meters(1_000.0);
        let ranges = query_bounds(center, radius);
        let east = MapPoint::from_lat_lng_deg(-16.5, -179.997);
        assert!(MapPoint::distance(center, east).unwrap() < radius);
        let hash = Geohash::encode(east, DEFAULT_PRECISION);
        assert!(ranges.iter().any(|r| r.contains(hash.as_str())));
    }
}
