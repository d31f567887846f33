//! Durable key-value store persisting every slot into a single JSON document on disk.

use std::{
    ffi::OsString,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::KeyValueStore;
use crate::dao::storage::{StorageError, StorageResult};

/// File-backed store. The whole map is rewritten on every mutation, and a mutation only becomes
/// visible to `get` once the file write succeeded.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<IndexMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty when the file does not exist yet.
    ///
    /// A file that is not a JSON object of strings is moved aside to `<name>.corrupt` and the
    /// store starts empty. Only I/O failures while reading are reported.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(contents) if contents.iter().all(u8::is_ascii_whitespace) => IndexMap::new(),
            Ok(contents) => match serde_json::from_slice::<IndexMap<String, String>>(&contents) {
                Ok(entries) => entries,
                Err(err) => {
                    let aside = corrupt_path(&path);
                    warn!(
                        path = %path.display(),
                        moved_to = %aside.display(),
                        error = %err,
                        "store file is corrupt; starting empty"
                    );
                    if let Err(err) = fs::rename(&path, &aside) {
                        warn!(
                            path = %path.display(),
                            error = %err,
                            "failed to move corrupt store file aside"
                        );
                    }
                    IndexMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "store file not found; starting empty");
                IndexMap::new()
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        debug!(path = %path.display(), slots = entries.len(), "opened store file");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, entries: &IndexMap<String, String>) -> StorageResult<()> {
        let payload =
            serde_json::to_string_pretty(entries).map_err(|source| StorageError::Encode { source })?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, payload).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.lock();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.lock();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.shift_remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

/// Sibling path a corrupt store file is moved to.
fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("store"));
    name.push(".corrupt");
    path.with_file_name(name)
}
