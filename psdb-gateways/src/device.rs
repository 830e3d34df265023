use anyhow::Result as Fallible;
use jfs::Store;
use psdb_boundary as json;
use psdb_core::{
    entities::{Distance, UserRef, UserSpace},
    gateways::device::DeviceStore,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{io, path::Path};

const KEY_SEARCH_RADIUS: &str = "search-radius";
const KEY_USER_SPACES: &str = "user-spaces";
const KEY_SESSION: &str = "session";

/// Device-local key/value store with one JSON file per key.
pub struct JsonDeviceStore {
    json_store: Store,
}

impl JsonDeviceStore {
    pub fn try_new<P: AsRef<Path>>(directory: P) -> io::Result<Self> {
        let json_store = Store::new(directory)?;
        Ok(Self { json_store })
    }

    pub fn path(&self) -> &Path {
        self.json_store.path()
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Fallible<Option<T>> {
        match self.json_store.get::<T>(key) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                log::warn!("Failed to load '{key}' from device store: {err}");
                Err(err.into())
            }
        }
    }

    fn save<T: Serialize + DeserializeOwned>(&self, key: &str, value: &T) -> Fallible<()> {
        self.json_store.save_with_id(value, key)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Fallible<()> {
        match self.json_store.delete(key) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for JsonDeviceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("JsonDeviceStore")
            .field("path", &self.path())
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SearchRadius {
    meters: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SignedIn {
    user: json::UserRef,
}

impl DeviceStore for JsonDeviceStore {
    fn load_search_radius(&self) -> Fallible<Option<Distance>> {
        let radius = self
            .load::<SearchRadius>(KEY_SEARCH_RADIUS)?
            .map(|SearchRadius { meters }| Distance::from_meters(meters))
            .filter(|radius| {
                let valid = radius.is_valid() && radius.to_meters() > 0.0;
                if !valid {
                    log::warn!("Ignoring invalid search radius {radius}");
                }
                valid
            });
        Ok(radius)
    }

    fn save_search_radius(&self, radius: Distance) -> Fallible<()> {
        self.save(
            KEY_SEARCH_RADIUS,
            &SearchRadius {
                meters: radius.to_meters(),
            },
        )
    }

    fn load_user_spaces(&self) -> Fallible<Option<Vec<UserSpace>>> {
        let Some(records) = self.load::<Vec<json::UserSpace>>(KEY_USER_SPACES)? else {
            return Ok(None);
        };
        let spaces = records
            .into_iter()
            .map(UserSpace::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(spaces))
    }

    fn save_user_spaces(&self, spaces: &[UserSpace]) -> Fallible<()> {
        let records: Vec<_> = spaces
            .iter()
            .cloned()
            .map(json::UserSpace::from)
            .collect();
        self.save(KEY_USER_SPACES, &records)
    }

    fn clear_user_spaces(&self) -> Fallible<()> {
        self.remove(KEY_USER_SPACES)
    }

    fn load_signed_in_user(&self) -> Fallible<Option<UserRef>> {
        Ok(self
            .load::<SignedIn>(KEY_SESSION)?
            .map(|SignedIn { user }| user.into()))
    }

    fn save_signed_in_user(&self, user: Option<&UserRef>) -> Fallible<()> {
        match user {
            Some(user) => self.save(
                KEY_SESSION,
                &SignedIn {
                    user: user.clone().into(),
                },
            ),
            None => self.remove(KEY_SESSION),
        }
    }
}
