use super::*;
use psdb_core::gateways::space_events::SpaceEventGateway;

/// Delete a space with all of its comments.
///
/// The event gateway is notified after the deletion has been
/// committed, e.g. for deleting the stored images.
pub fn delete_space(
    connections: &sqlite::Connections,
    events: &dyn SpaceEventGateway,
    id: &str,
    session: &mut Session<'_>,
) -> Result<Space> {
    let deleted_by = session.current_user();
    let space = connections
        .exclusive()?
        .transaction(|conn| usecases::delete_space(conn, id, deleted_by))?;
    events.space_deleted(&space);
    session.forget_user_space(&space.id)?;
    Ok(space)
}
