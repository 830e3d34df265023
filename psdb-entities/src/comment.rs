use crate::{activity::*, cursor::*, id::*};

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id       : Id,
    pub space_id : Id,
    pub text     : String,
    pub created  : Activity,
}

impl Comment {
    pub fn cursor(&self) -> PageCursor {
        PageCursor {
            created_at: self.created.at,
            id: self.id.clone(),
        }
    }
}
