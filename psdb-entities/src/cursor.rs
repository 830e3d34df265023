use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{id::*, time::*};

const SEPARATOR: char = ':';

/// Opaque pointer to the last item of a fetched page.
///
/// Items are ordered by their creation time (descending) and
/// ties are resolved by their id (descending). The next page
/// starts strictly after the cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor {
    pub created_at: TimestampMs,
    pub id: Id,
}

impl PageCursor {
    /// Check if an item at the given position follows
    /// the cursor in descending order.
    pub fn precedes(&self, created_at: TimestampMs, id: &Id) -> bool {
        created_at < self.created_at || (created_at == self.created_at && *id < self.id)
    }

    pub fn encode_to_string(&self) -> String {
        let plain = format!("{}{}{}", self.created_at.as_millis(), SEPARATOR, self.id);
        bs58::encode(plain).into_string()
    }

    pub fn decode_from_str(encoded: &str) -> Result<Self, PageCursorDecodingError> {
        let bytes = bs58::decode(encoded).into_vec()?;
        let plain = String::from_utf8(bytes)?;
        let (millis, id) = plain
            .split_once(SEPARATOR)
            .ok_or(PageCursorDecodingError::Format)?;
        let created_at = millis
            .parse::<i64>()
            .map(TimestampMs::from_millis)
            .map_err(|_| PageCursorDecodingError::Format)?;
        let id = Id::from(id);
        if !id.is_valid() {
            return Err(PageCursorDecodingError::Format);
        }
        Ok(Self { created_at, id })
    }
}

#[derive(Debug, Error)]
pub enum PageCursorDecodingError {
    #[error(transparent)]
    Bs58(#[from] bs58::decode::Error),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Malformed page cursor")]
    Format,
}

impl FromStr for PageCursor {
    type Err = PageCursorDecodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode_from_str(s)
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encode_to_string())
    }
}
