use super::*;
use psdb_core::gateways::file::FileStore;

pub fn upload_space_image(
    connections: &sqlite::Connections,
    files: &dyn FileStore,
    space_id: &str,
    file_name: &str,
    data: &[u8],
    uploaded_by: Option<&UserRef>,
) -> Result<ImageRef> {
    let image = connections.exclusive()?.transaction(|conn| {
        usecases::upload_space_image(conn, files, space_id, file_name, data, uploaded_by)
    })?;
    info!("Uploaded image {image}");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::super::tests::prelude::*;

    #[test]
    fn upload_image_twice() {
        let fixture = BackendFixture::new();
        let mut session = fixture.signed_in_session("alice");
        let space = fixture
            .create_space(&mut session, "Herzl", "1", 32.0, 34.0)
            .unwrap();
        let alice = user("alice");
        for data in [b"v1", b"v2"] {
            let image = flows::upload_space_image(
                &fixture.db_connections,
                &fixture.files,
                space.id.as_str(),
                "door.jpg",
                data,
                Some(&alice),
            )
            .unwrap();
            assert_eq!("images/tel-aviv-herzl-1/door.jpg", image.as_str());
        }
        let stored = fixture
            .db_connections
            .shared()
            .unwrap()
            .get_space(space.id.as_str())
            .unwrap();
        assert_eq!(1, stored.images.len());
        assert_eq!(
            vec!["images/tel-aviv-herzl-1/door.jpg"],
            fixture.files.list_files("images/").unwrap()
        );
    }

    #[test]
    fn reject_invalid_file_names() {
        let fixture = BackendFixture::new();
        let mut session = fixture.signed_in_session("alice");
        let space = fixture
            .create_space(&mut session, "Herzl", "1", 32.0, 34.0)
            .unwrap();
        let err = flows::upload_space_image(
            &fixture.db_connections,
            &fixture.files,
            space.id.as_str(),
            "../door.jpg",
            b"",
            Some(&user("alice")),
        )
        .unwrap_err();
        assert!(matches!(err.parameter(), Some(usecases::Error::Image(_))));
        assert!(fixture.files.list_files("").unwrap().is_empty());
    }

    #[test]
    fn roll_back_image_ref_if_the_file_cannot_be_written() {
        let fixture = BackendFixture::new();
        let mut session = fixture.signed_in_session("alice");
        let space = fixture
            .create_space(&mut session, "Herzl", "1", 32.0, 34.0)
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"").unwrap();
        assert!(flows::upload_space_image(
            &fixture.db_connections,
            &LocalFileStore::new(blocked),
            space.id.as_str(),
            "door.jpg",
            b"v1",
            Some(&user("alice")),
        )
        .is_err());
        let stored = fixture
            .db_connections
            .shared()
            .unwrap()
            .get_space(space.id.as_str())
            .unwrap();
        assert!(stored.images.is_empty());
    }
}
