use super::prelude::*;
use crate::gateways::file::FileStore;

/// Delete all files stored under the image prefix of a space.
///
/// Returns the number of deleted files.
pub fn cleanup_space_images<F>(files: &F, space_id: &Id) -> Result<usize>
where
    F: FileStore + ?Sized,
{
    let prefix = ImageRef::space_prefix(space_id);
    files
        .delete_files_with_prefix(&prefix)
        .map_err(Error::Gateway)
}

#[cfg(test)]
mod tests {
    use super::super::tests::*;
    use super::*;

    #[test]
    fn delete_only_images_of_the_space() {
        let files = MockFileStore::default();
        files.put_file("images/a/1.jpg", b"1").unwrap();
        files.put_file("images/a/2.jpg", b"2").unwrap();
        files.put_file("images/ab/1.jpg", b"3").unwrap();
        assert_eq!(2, cleanup_space_images(&files, &"a".into()).unwrap());
        assert_eq!(
            vec!["images/ab/1.jpg".to_string()],
            files.list_files("images/").unwrap()
        );
        assert_eq!(0, cleanup_space_images(&files, &"a".into()).unwrap());
    }
}
