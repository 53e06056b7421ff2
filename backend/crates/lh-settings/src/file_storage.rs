use crate::{StorageBackend, StoreError, StoreResult};

use std::path::{Path, PathBuf};

const FILE_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "json.tmp";

/// One JSON file per key inside a directory.
///
/// Keys are percent-escaped into file names (`settings:global` becomes
/// `settings%3Aglobal.json`), so distinct keys never share a file. Writes go
/// to a temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", Self::escape(key), FILE_EXTENSION))
    }

    fn escape(key: &str) -> String {
        let mut escaped = String::with_capacity(key.len());
        for byte in key.bytes() {
            match byte {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                    escaped.push(byte as char)
                }
                _ => escaped.push_str(&format!("%{:02X}", byte)),
            }
        }
        escaped
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        let temp = path.with_extension(TEMP_EXTENSION);

        std::fs::write(&temp, value).map_err(|e| StoreError::Io {
            path: temp.clone(),
            source: e,
        })?;

        std::fs::rename(&temp, &path).map_err(|e| StoreError::Io { path, source: e })
    }
}
