use super::*;
use psdb_core::gateways::geocode::GeoCodingGateway;

/// Add a new space unless a space with the same address exists.
///
/// The space is remembered in the "my spaces" list of the session.
pub fn create_space(
    connections: &sqlite::Connections,
    geocoder: Option<&dyn GeoCodingGateway>,
    new_space: usecases::NewSpace,
    session: &mut Session<'_>,
) -> Result<Space> {
    // Geocoding happens outside of the transaction
    let storable = usecases::prepare_new_space(geocoder, new_space, session.current_user())?;
    let space = connections
        .exclusive()?
        .transaction(|conn| usecases::store_new_space(conn, storable))
        .inspect_err(|err| warn!("Failed to store new space: {err}"))?;
    info!("Created space {} at {}", space.id, space.address);
    session.remember_user_space(&space)?;
    Ok(space)
}

#[cfg(test)]
mod tests {
    use super::super::tests::prelude::*;

    #[test]
    fn create_space_with_duplicate_address() {
        let fixture = BackendFixture::new();
        let mut session = fixture.signed_in_session("alice");
        let space = fixture
            .create_space(&mut session, "Dizengoff", "50", 32.0853, 34.7818)
            .unwrap();
        assert_eq!("tel-aviv-dizengoff-50", space.id.as_str());

        let err = fixture
            .create_space(&mut session, "DIZENGOFF ", "50", 32.0, 34.0)
            .unwrap_err();
        assert!(matches!(
            err.parameter(),
            Some(usecases::Error::DuplicateAddress(id)) if id.as_str() == "tel-aviv-dizengoff-50"
        ));
        let stored = fixture
            .db_connections
            .shared()
            .unwrap()
            .get_space("tel-aviv-dizengoff-50")
            .unwrap();
        assert_eq!(space.pos, stored.pos);
        assert_eq!(1, fixture.user_spaces(&mut session).len());
    }

    #[test]
    fn create_space_requires_sign_in() {
        let fixture = BackendFixture::new();
        let mut session = fixture.session();
        let err = fixture
            .create_space(&mut session, "Herzl", "1", 32.0, 34.0)
            .unwrap_err();
        assert!(matches!(err.parameter(), Some(usecases::Error::Unauthorized)));
        assert_eq!(0, fixture.db_connections.shared().unwrap().count_spaces().unwrap());
    }
}
