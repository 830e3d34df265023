use crate::{time::*, user::*};

/// Who did something and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub at: TimestampMs,
    pub by: UserRef,
}

impl Activity {
    pub fn now(by: UserRef) -> Self {
        Self {
            at: TimestampMs::now(),
            by,
        }
    }
}
