use psdb_core::{
    entities::Space, gateways::file::FileStore, gateways::space_events::SpaceEventGateway,
    usecases,
};

/// Deletes the stored images of a space after the
/// space itself has been deleted.
///
/// Failures are logged and never retried.
#[derive(Debug, Clone)]
pub struct ImageCleanupTrigger<F> {
    files: F,
}

impl<F> ImageCleanupTrigger<F> {
    pub fn new(files: F) -> Self {
        Self { files }
    }
}

impl<F> SpaceEventGateway for ImageCleanupTrigger<F>
where
    F: FileStore,
{
    fn space_deleted(&self, space: &Space) {
        match usecases::cleanup_space_images(&self.files, &space.id) {
            Ok(0) => log::debug!("No images of space {} found", space.id),
            Ok(count) => log::info!("Deleted {count} image(s) of space {}", space.id),
            Err(err) => log::error!("Failed to delete images of space {}: {err}", space.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::LocalFileStore;
    use psdb_entities::builders::*;

    #[test]
    fn delete_images_of_deleted_space() {
        let dir = tempfile::tempdir().unwrap();
        let files = LocalFileStore::new(dir.path());
        files.put_file("images/a/1.jpg", b"1").unwrap();
        files.put_file("images/b/1.jpg", b"2").unwrap();
        let trigger = ImageCleanupTrigger::new(files.clone());
        trigger.space_deleted(&Space::build().id("a").finish());
        assert_eq!(vec!["images/b/1.jpg"], files.list_files("").unwrap());
    }

    struct Unavailable;

    impl FileStore for Unavailable {
        fn put_file(&self, _: &str, _: &[u8]) -> anyhow::Result<()> {
            unimplemented!()
        }
        fn list_files(&self, _: &str) -> anyhow::Result<Vec<String>> {
            unimplemented!()
        }
        fn delete_files_with_prefix(&self, _: &str) -> anyhow::Result<usize> {
            Err(anyhow::anyhow!("storage unavailable"))
        }
    }

    #[test]
    fn failures_are_not_propagated() {
        let trigger = ImageCleanupTrigger::new(Unavailable);
        trigger.space_deleted(&Space::build().id("a").finish());
    }
}
