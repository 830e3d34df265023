use anyhow::Result as Fallible;
use psdb_entities::{geo::Distance, user::*};

/// On-device key/value persistence.
///
/// Missing values are reported as `None` and
/// never as an error.
pub trait DeviceStore {
    fn load_search_radius(&self) -> Fallible<Option<Distance>>;
    fn save_search_radius(&self, radius: Distance) -> Fallible<()>;

    fn load_user_spaces(&self) -> Fallible<Option<Vec<UserSpace>>>;
    fn save_user_spaces(&self, spaces: &[UserSpace]) -> Fallible<()>;
    fn clear_user_spaces(&self) -> Fallible<()>;

    fn load_signed_in_user(&self) -> Fallible<Option<UserRef>>;
    fn save_signed_in_user(&self, user: Option<&UserRef>) -> Fallible<()>;
}
