use super::*;

/// Spaces around the current location of the session,
/// nearest first.
pub fn nearby_spaces(
    connections: &sqlite::Connections,
    session: &Session<'_>,
) -> Result<Vec<usecases::NearbySpace>> {
    let conn = connections.shared()?;
    let nearby = session.nearby_spaces(&conn)?;
    debug!(
        "Found {} space(s) within {} around {:?}",
        nearby.len(),
        session.search_radius(),
        session.location()
    );
    Ok(nearby)
}
