pub mod prelude {
    pub use psdb_core::{
        entities::*,
        gateways::{auth::AuthState, device::DeviceStore, file::FileStore},
        repositories::{Error as RepoError, *},
        session::Session,
        usecases,
    };
    pub use psdb_gateways::{
        cleanup::ImageCleanupTrigger, device::JsonDeviceStore, files::LocalFileStore,
        identity::StaticIdentityProvider,
    };

    pub mod sqlite {
        pub use super::super::super::sqlite::*;
    }

    pub use crate::{error::AppError, prelude as flows};

    use tempfile::TempDir;

    pub fn user(name: &str) -> UserRef {
        UserRef {
            id: name.into(),
            display_name: name.to_uppercase(),
        }
    }

    pub struct BackendFixture {
        pub db_connections: sqlite::Connections,
        pub device: JsonDeviceStore,
        pub files: LocalFileStore,
        _dir: TempDir,
    }

    impl BackendFixture {
        pub fn new() -> Self {
            let _ = env_logger::builder().is_test(true).try_init();
            let db_connections = sqlite::Connections::init(":memory:", 1).unwrap();
            psdb_db_sqlite::run_embedded_database_migrations(db_connections.exclusive().unwrap())
                .unwrap();
            let dir = tempfile::tempdir().unwrap();
            let device = JsonDeviceStore::try_new(dir.path()).unwrap();
            let files = LocalFileStore::new(dir.path().join("files"));
            Self {
                db_connections,
                device,
                files,
                _dir: dir,
            }
        }

        pub fn session(&self) -> Session<'_> {
            Session::restore(&self.device, Distance::from_meters(1_000.0), 3).unwrap()
        }

        pub fn signed_in_session(&self, name: &str) -> Session<'_> {
            let mut session = self.session();
            let conn = self.db_connections.shared().unwrap();
            session
                .apply_auth_state(&conn, AuthState::SignedIn(user(name)))
                .unwrap();
            session
        }

        pub fn cleanup_trigger(&self) -> ImageCleanupTrigger<LocalFileStore> {
            ImageCleanupTrigger::new(self.files.clone())
        }

        pub fn create_space(
            &self,
            session: &mut Session<'_>,
            street: &str,
            number: &str,
            lat: f64,
            lng: f64,
        ) -> Result<Space, AppError> {
            let new_space = usecases::NewSpace {
                space_type: SpaceType::PublicShelter,
                street: street.into(),
                number: number.into(),
                city: "Tel Aviv".into(),
                lat: Some(lat),
                lng: Some(lng),
                description: "Shelter".into(),
                ..Default::default()
            };
            flows::create_space(&self.db_connections, None, new_space, session)
        }

        pub fn create_comment(&self, space_id: &Id, text: &str, author: &str) -> Comment {
            flows::create_comment(
                &self.db_connections,
                usecases::NewComment {
                    space_id: space_id.to_string(),
                    text: text.into(),
                },
                Some(&user(author)),
            )
            .unwrap()
        }

        pub fn user_spaces(&self, session: &mut Session<'_>) -> Vec<UserSpace> {
            let conn = self.db_connections.shared().unwrap();
            session.user_spaces(&conn).unwrap().to_vec()
        }
    }
}
