use anyhow::{anyhow, Context as _, Result};
use clap::{Parser, Subcommand};
use psdb_application::{error::AppError, prelude as flows};
use psdb_boundary as json;
use psdb_core::{
    entities::*, gateways::geocode::GeoCodingGateway, repositories::Error as RepoError,
    session::Session, usecases,
};
use psdb_db_sqlite::Connections;
use psdb_gateways::{
    cleanup::ImageCleanupTrigger, device::JsonDeviceStore, files::LocalFileStore,
    identity::StaticIdentityProvider, opencage::OpenCage,
};
use serde::Serialize;
use std::{fs, path::PathBuf};

use crate::config::{Config, GeocodingGateway};

const GENERIC_ALERT: &str = "Something went wrong, please try again later.";

#[derive(Parser, Debug)]
#[command(name = "psdb", version)]
#[command(about = "Discover, report and discuss protected spaces nearby", long_about = None)]
struct Cli {
    /// Configuration file (default: psdb.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// URL to the database
    #[arg(long, value_name = "DATABASE_URL")]
    db_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with the configured account
    SignIn {
        /// Use this account instead of the configured account
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long, requires = "user_id")]
        display_name: Option<String>,
    },
    /// Sign out and forget all cached data of the user
    SignOut,
    /// Show the signed-in user
    Whoami,
    /// Change the search radius
    SetRadius { meters: f64 },
    /// List the spaces around a location, nearest first
    Nearby {
        #[arg(long, value_name = "LAT,LNG")]
        at: MapPoint,
        /// Search radius in meters, remembered for subsequent searches
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Report a new protected space
    AddSpace {
        #[arg(long = "type", default_value = "other")]
        space_type: SpaceType,
        #[arg(long)]
        street: String,
        #[arg(long)]
        number: String,
        #[arg(long)]
        city: String,
        /// The address is geocoded if missing
        #[arg(long, value_name = "LAT,LNG")]
        at: Option<MapPoint>,
        #[arg(long)]
        map_link: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show a single space
    Show { id: String },
    /// List the recently created spaces
    Recent {
        /// Load all pages
        #[arg(long)]
        all: bool,
    },
    /// List the spaces created by the signed-in user
    MySpaces,
    /// Comment on a space
    Comment { space_id: String, text: String },
    /// List the comments of a space, newest first
    Comments {
        space_id: String,
        /// Continue after this page cursor
        #[arg(long)]
        after: Option<String>,
        /// Load all pages
        #[arg(long)]
        all: bool,
    },
    /// Attach an image to a space
    UploadImage { space_id: String, file: PathBuf },
    /// Delete a space that has been created by the signed-in user
    Delete { space_id: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn geocoding_gateway(cfg: &Config) -> Option<OpenCage> {
    match &cfg.geocoding.gateway {
        Some(GeocodingGateway::OpenCage { api_key }) => {
            log::debug!("Use OpenCage geocoding gateway");
            Some(OpenCage::new(Some(api_key.clone())))
        }
        None => None,
    }
}

pub fn run() -> Result<()> {
    let Cli {
        config,
        db_url,
        command,
    } = Cli::parse();

    let mut cfg = Config::try_load_from_file_or_default(config.as_ref())?;
    if let Some(db_url) = db_url {
        cfg.db.conn_sqlite = db_url;
    }

    log::debug!("Connecting to database {}", cfg.db.conn_sqlite);
    let connections = Connections::init(&cfg.db.conn_sqlite, cfg.db.conn_pool_size)?;
    psdb_db_sqlite::run_embedded_database_migrations(connections.exclusive()?)?;

    fs::create_dir_all(&cfg.storage.device_dir).with_context(|| {
        format!(
            "Failed to create device directory {}",
            cfg.storage.device_dir.display()
        )
    })?;
    let device = JsonDeviceStore::try_new(&cfg.storage.device_dir)?;
    let files = LocalFileStore::new(&cfg.storage.files_dir);
    let geocoder = geocoding_gateway(&cfg);

    let mut session = Session::restore(&device, cfg.search.default_radius, cfg.search.page_size)?;
    let mirror = flows::AuthStateMirror::new(session.auth_state().clone());
    let mut listener = mirror.subscribe();

    match command {
        Command::SignIn {
            user_id,
            display_name,
        } => {
            let account = match user_id {
                Some(id) => Some(UserRef {
                    display_name: display_name.unwrap_or_else(|| id.clone()),
                    id: id.into(),
                }),
                None => cfg.auth.account.clone(),
            }
            .ok_or_else(|| anyhow!("No account configured"))?;
            let provider = StaticIdentityProvider::new(account);
            let user = flows::sign_in(&provider, &mirror)?;
            flows::sync_session(&connections, &mut listener, &mut session)?;
            print_json(&json::UserRef::from(user))?;
        }
        Command::SignOut => {
            let Some(user) = session.current_user().cloned() else {
                log::info!("Not signed in");
                return Ok(());
            };
            let provider = StaticIdentityProvider::new(user);
            flows::sign_out(&provider, &mirror)?;
            flows::sync_session(&connections, &mut listener, &mut session)?;
        }
        Command::Whoami => {
            print_json(&session.current_user().cloned().map(json::UserRef::from))?;
        }
        Command::SetRadius { meters } => {
            session.set_search_radius(Distance::from_meters(meters))?;
            log::info!("Search radius: {}", session.search_radius());
        }
        Command::Nearby { at, radius } => {
            session.update_location(at)?;
            if let Some(meters) = radius {
                session.set_search_radius(Distance::from_meters(meters))?;
            }
            let nearby: Vec<_> = flows::nearby_spaces(&connections, &session)?
                .into_iter()
                .map(|usecases::NearbySpace { space, distance }| {
                    json::NearbySpace::from((space, distance))
                })
                .collect();
            print_json(&nearby)?;
        }
        Command::AddSpace {
            space_type,
            street,
            number,
            city,
            at,
            map_link,
            description,
        } => {
            let (lat, lng) = at.map(MapPoint::to_lat_lng_deg).unzip();
            let new_space = usecases::NewSpace {
                space_type,
                street,
                number,
                city,
                map_link,
                lat,
                lng,
                description,
            };
            let geocoder = geocoder.as_ref().map(|gw| gw as &dyn GeoCodingGateway);
            let space = flows::create_space(&connections, geocoder, new_space, &mut session)?;
            print_json(&json::Space::from(space))?;
        }
        Command::Show { id } => {
            let space = usecases::load_space(&connections.shared()?, &id)?;
            print_json(&json::Space::from(space))?;
        }
        Command::Recent { all } => {
            let conn = connections.shared()?;
            session.load_recent_spaces(&conn)?;
            while all && session.recent_spaces().has_more() {
                session.load_more_recent_spaces(&conn)?;
            }
            let list = session.recent_spaces();
            print_json(&json::Page::<json::Space>::from_entities(
                list.items().iter().cloned(),
                list.cursor(),
            ))?;
        }
        Command::MySpaces => {
            let conn = connections.shared()?;
            let spaces: Vec<_> = session
                .user_spaces(&conn)?
                .iter()
                .cloned()
                .map(json::UserSpace::from)
                .collect();
            print_json(&spaces)?;
        }
        Command::Comment { space_id, text } => {
            let comment = flows::create_comment(
                &connections,
                usecases::NewComment { space_id, text },
                session.current_user(),
            )?;
            print_json(&json::Comment::from(comment))?;
        }
        Command::Comments {
            space_id,
            after,
            all,
        } => {
            let conn = connections.shared()?;
            let space_id = Id::from(space_id);
            match after {
                Some(after) => {
                    let cursor =
                        PageCursor::decode_from_str(&after).map_err(usecases::Error::from)?;
                    session.load_more_comments(&conn, &space_id, Some(cursor))?;
                }
                None => {
                    session.load_comments(&conn, &space_id)?;
                }
            }
            while all
                && session
                    .comments(&space_id)
                    .is_some_and(|list| list.has_more())
            {
                session.load_more_comments(&conn, &space_id, None)?;
            }
            let page = session
                .comments(&space_id)
                .map(|list| {
                    json::Page::<json::Comment>::from_entities(
                        list.items().iter().cloned(),
                        list.cursor(),
                    )
                })
                .unwrap_or_else(|| json::Page {
                    items: vec![],
                    next: None,
                });
            print_json(&page)?;
        }
        Command::UploadImage { space_id, file } => {
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("Invalid file name: {}", file.display()))?;
            let data =
                fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            let image = flows::upload_space_image(
                &connections,
                &files,
                &space_id,
                file_name,
                &data,
                session.current_user(),
            )?;
            print_json(&image.as_str())?;
        }
        Command::Delete { space_id } => {
            let trigger = ImageCleanupTrigger::new(files.clone());
            let space = flows::delete_space(&connections, &trigger, &space_id, &mut session)?;
            log::info!("Deleted space {}", space.id);
        }
    }
    Ok(())
}

fn parameter_alert(err: &usecases::Error) -> String {
    match err {
        usecases::Error::Repo(RepoError::NotFound) => "Not found.".into(),
        usecases::Error::Repo(_) | usecases::Error::Gateway(_) => GENERIC_ALERT.into(),
        err => err.to_string(),
    }
}

/// The message that is presented to the user.
///
/// Validation errors are reported individually, backend
/// failures only with a generic message.
pub fn alert(err: &anyhow::Error) -> String {
    if let Some(app_err) = err.downcast_ref::<AppError>() {
        return app_err
            .parameter()
            .map(parameter_alert)
            .unwrap_or_else(|| GENERIC_ALERT.into());
    }
    if let Some(err) = err.downcast_ref::<usecases::Error>() {
        return parameter_alert(err);
    }
    format!("{err:#}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_nearby_location() {
        let cli = Cli::try_parse_from(["psdb", "nearby", "--at", "32.0853,34.7818"]).unwrap();
        let Command::Nearby { at, radius } = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(MapPoint::from_lat_lng_deg(32.0853, 34.7818), at);
        assert!(radius.is_none());
        assert!(Cli::try_parse_from(["psdb", "nearby", "--at", "north"]).is_err());
    }

    #[test]
    fn alert_validation_errors_individually() {
        let err = anyhow::Error::from(AppError::from(usecases::Error::from(
            psdb_core::util::validate::SpaceInvalidation::City,
        )));
        assert_eq!("Missing city", alert(&err));
        let err = anyhow::Error::from(AppError::from(RepoError::Other(anyhow!("disk full"))));
        assert_eq!(GENERIC_ALERT, alert(&err));
        let err = anyhow::Error::from(AppError::from(usecases::Error::Repo(RepoError::NotFound)));
        assert_eq!("Not found.", alert(&err));
    }
}
