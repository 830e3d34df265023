use anyhow::Result as Fallible;

/// Object storage addressed by slash-separated paths.
pub trait FileStore {
    /// Create or replace a file.
    fn put_file(&self, path: &str, data: &[u8]) -> Fallible<()>;

    /// All paths starting with `prefix` in lexicographical order.
    fn list_files(&self, prefix: &str) -> Fallible<Vec<String>>;

    /// Returns the number of deleted files.
    fn delete_files_with_prefix(&self, prefix: &str) -> Fallible<usize>;
}
