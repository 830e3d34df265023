use std::fmt;

use crate::url::Url;

/// Structured postal address of a space.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub street   : String,
    pub number   : String,
    pub city     : String,
    /// Link to the location on an external map service.
    pub map_link : Option<Url>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.trim().is_empty()
            && self.number.trim().is_empty()
            && self.city.trim().is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}, {}", self.street, self.number, self.city)
    }
}
