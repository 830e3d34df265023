use crate::{address::*, id::*, time::*};

/// Reference to a signed-in user as provided by the identity provider.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserRef {
    pub id           : Id,
    pub display_name : String,
}

/// Locally cached projection of a space that has been
/// created by the current user ("my spaces").
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSpace {
    pub id         : Id,
    pub address    : Address,
    pub created_at : TimestampMs,
}
