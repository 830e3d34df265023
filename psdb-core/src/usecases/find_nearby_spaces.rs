use std::collections::HashSet;

use super::prelude::*;

/// Upper bound for the search radius.
pub const MAX_RADIUS: Distance = Distance::from_meters(20_000.0);

#[derive(Debug, Clone, PartialEq)]
pub struct NearbySpace {
    pub space: Space,
    pub distance: Distance,
}

pub fn is_valid_radius(radius: Distance) -> bool {
    radius.to_meters() > 0.0 && radius <= MAX_RADIUS
}

/// Find all spaces within `radius` around `center`, nearest first.
///
/// Candidates are collected by scanning the geohash ranges that
/// cover the circle. Candidates outside of the circle are discarded.
pub fn find_nearby_spaces<R: SpaceRepo>(
    repo: &R,
    center: MapPoint,
    radius: Distance,
) -> Result<Vec<NearbySpace>> {
    if !center.is_valid() {
        return Err(Error::InvalidPosition);
    }
    if !is_valid_radius(radius) {
        return Err(Error::InvalidRadius);
    }
    let bounds = query_bounds(center, radius);
    let mut visited = HashSet::new();
    let mut candidate_count = 0;
    let mut results = vec![];
    for range in &bounds {
        for space in repo.load_spaces_in_geohash_range(range)? {
            if !visited.insert(space.id.clone()) {
                continue;
            }
            candidate_count += 1;
            let Some(distance) = MapPoint::distance(center, space.pos) else {
                log::warn!("Space {} has an invalid position", space.id);
                continue;
            };
            if distance <= radius {
                results.push(NearbySpace { space, distance });
            }
        }
    }
    log::debug!(
        "Found {} of {} candidate(s) within {} around {} in {} geohash range(s)",
        results.len(),
        candidate_count,
        radius,
        center,
        bounds.len()
    );
    results.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.space.id.cmp(&b.space.id))
    });
    Ok(results)
}
