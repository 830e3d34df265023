use psdb_entities::space::Space;

pub trait SpaceEventGateway {
    /// Invoked after the deletion of a space has been committed.
    ///
    /// Implementations must not fail, errors are only logged.
    fn space_deleted(&self, space: &Space);
}
