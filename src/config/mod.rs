use anyhow::{anyhow, bail, Result};
use psdb_core::{
    entities::{Distance, UserRef},
    usecases,
};
use std::{env, fs, io::ErrorKind, path::Path, path::PathBuf};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "psdb.toml";

const ENV_NAME_DB_URL: &str = "DATABASE_URL";

pub struct Config {
    pub db: Db,
    pub storage: Storage,
    pub search: Search,
    pub auth: Auth,
    pub geocoding: Geocoding,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::debug!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::debug!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(db_url) = env::var(ENV_NAME_DB_URL) {
            cfg.db.conn_sqlite = db_url;
        }
        Ok(cfg)
    }
}

pub struct Db {
    /// SQLite connection
    pub conn_sqlite: String,
    pub conn_pool_size: u32,
}

pub struct Storage {
    pub files_dir: PathBuf,
    pub device_dir: PathBuf,
}

pub struct Search {
    pub default_radius: Distance,
    pub page_size: u64,
}

pub struct Auth {
    /// The configured account of the identity provider
    pub account: Option<UserRef>,
}

pub struct Geocoding {
    pub gateway: Option<GeocodingGateway>,
}

pub enum GeocodingGateway {
    OpenCage { api_key: String },
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            db,
            storage,
            search,
            auth,
            geocoding,
            gateway,
        } = from;

        let raw::Db {
            connection_sqlite,
            connection_pool_size,
        } = db.unwrap_or_default();
        if connection_pool_size == 0 {
            bail!("The connection pool must not be empty");
        }
        let db = Db {
            conn_sqlite: connection_sqlite,
            conn_pool_size: connection_pool_size,
        };

        let raw::Storage {
            files_dir,
            device_dir,
        } = storage.unwrap_or_default();
        let storage = Storage {
            files_dir,
            device_dir,
        };

        let raw::Search {
            default_radius,
            page_size,
        } = search.unwrap_or_default();
        let default_radius = Distance::from_meters(default_radius);
        if !usecases::is_valid_radius(default_radius) {
            bail!("Invalid default search radius: {default_radius}");
        }
        if page_size == 0 || page_size > usecases::MAX_PAGE_SIZE {
            bail!(
                "The page size must be between 1 and {}",
                usecases::MAX_PAGE_SIZE
            );
        }
        let search = Search {
            default_radius,
            page_size,
        };

        let raw::Auth {
            user_id,
            display_name,
        } = auth.unwrap_or_default();
        let account = user_id
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
            .map(|id| UserRef {
                display_name: display_name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| id.clone()),
                id: id.into(),
            });
        let auth = Auth { account };

        let geo_gateway = match geocoding.and_then(|g| g.gateway) {
            Some(gw_name) => {
                let gateway = gateway.ok_or_else(|| anyhow!("Missing gateway configuration"))?;
                let gw = match gw_name {
                    raw::GeocodingGateway::Opencage => {
                        let raw::OpenCage { api_key } = gateway
                            .opencage
                            .ok_or_else(|| anyhow!("Missing 'opencage' gateway configuration"))?;
                        GeocodingGateway::OpenCage { api_key }
                    }
                };
                Some(gw)
            }
            None => None,
        };
        let geocoding = Geocoding {
            gateway: geo_gateway,
        };

        Ok(Self {
            db,
            storage,
            search,
            auth,
            geocoding,
        })
    }
}
