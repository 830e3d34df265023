use lazy_static::lazy_static;
use regex::Regex;

use crate::entities::{Address, Id};

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^\p{L}\p{N}]+").unwrap();
}

fn slug(s: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(&s.trim().to_lowercase(), "-")
        .trim_matches('-')
        .to_owned()
}

/// Derive the id of a space from its address.
///
/// Different spellings of the same address (case, whitespace,
/// punctuation) result in the same id: `<city>-<street>-<number>`.
pub fn derive_space_id(addr: &Address) -> Id {
    [addr.city.as_str(), addr.street.as_str(), addr.number.as_str()]
        .into_iter()
        .map(slug)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .into()
}
