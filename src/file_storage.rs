use crate::backend::StorageBackend;
use std::{
    fs,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::NamedTempFile;
use tracing::{debug, error};

/// Keeps every key as `<directory>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: Arc<PathBuf>,
}

impl FileStorage {
    pub fn new(directory: impl Into<PathBuf>) -> io::Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self {
            directory: Arc::new(directory),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn is_available(&self) -> bool {
        self.directory.is_dir()
    }

    fn read(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(?path, "Nothing stored yet");
                None
            }
            Err(err) => {
                error!(?err, ?path, "Failed to read stored value");
                None
            }
        }
    }

    // The value lands in a temp file first and is renamed over the target, so a
    // reader never sees a half-written collection.
    fn write(&self, key: &str, value: String) -> Result<(), String> {
        let path = self.path_for(key);
        let mut file = NamedTempFile::new_in(self.directory.as_path())
            .map_err(|err| format!("Failed to create temporary file: {err}"))?;
        file.write_all(value.as_bytes())
            .map_err(|err| format!("Failed to write temporary file: {err}"))?;
        file.persist(&path)
            .map_err(|err| format!("Failed to replace {}: {}", path.display(), err.error))?;
        Ok(())
    }
}
