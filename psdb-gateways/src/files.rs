use anyhow::{anyhow, Result as Fallible};
use psdb_core::gateways::file::FileStore;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Empty path")]
    Empty,
    #[error("Absolute paths are not permitted: {0}")]
    Absolute(String),
    #[error("Invalid path segment '{segment}' in {path}")]
    Segment { path: String, segment: String },
}

/// File store rooted in a local directory.
///
/// Paths are relative, slash-separated and must not
/// escape the root directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        if path.starts_with('/') {
            return Err(PathError::Absolute(path.to_owned()));
        }
        let mut resolved = self.root.clone();
        for segment in path.split('/') {
            if segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains('\\')
                || segment.contains(':')
            {
                return Err(PathError::Segment {
                    path: path.to_owned(),
                    segment: segment.to_owned(),
                });
            }
            resolved.push(segment);
        }
        Ok(resolved)
    }

    /// The deepest directory that contains all files with the prefix.
    fn walk_root(&self, prefix: &str) -> Result<PathBuf, PathError> {
        match prefix.rfind('/') {
            Some(pos) => self.resolve(&prefix[..pos]),
            None => Ok(self.root.clone()),
        }
    }

    fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let segments = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        Some(segments.join("/"))
    }
}

impl FileStore for LocalFileStore {
    fn put_file(&self, path: &str, data: &[u8]) -> Fallible<()> {
        let file_path = self.resolve(path)?;
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file_path, data)?;
        log::debug!("Stored {} bytes in {}", data.len(), file_path.display());
        Ok(())
    }

    fn list_files(&self, prefix: &str) -> Fallible<Vec<String>> {
        let walk_root = self.walk_root(prefix)?;
        if !walk_root.is_dir() {
            return Ok(vec![]);
        }
        let mut paths = vec![];
        for entry in WalkDir::new(&walk_root) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(path) = self.relative_path(entry.path()) else {
                log::warn!("Skipping file with non UTF-8 path: {}", entry.path().display());
                continue;
            };
            if path.starts_with(prefix) {
                paths.push(path);
            }
        }
        paths.sort_unstable();
        Ok(paths)
    }

    fn delete_files_with_prefix(&self, prefix: &str) -> Fallible<usize> {
        if prefix.is_empty() {
            return Err(anyhow!("Refusing to delete all files"));
        }
        let paths = self.list_files(prefix)?;
        for path in &paths {
            let file_path = self.resolve(path)?;
            match fs::remove_file(&file_path) {
                Ok(()) => log::debug!("Deleted {}", file_path.display()),
                // Concurrently deleted
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        if let Some(dir) = prefix.strip_suffix('/') {
            if let Ok(dir) = self.resolve(dir) {
                // Only succeeds if the directory is empty
                let _ = fs::remove_dir(dir);
            }
        }
        Ok(paths.len())
    }
}
