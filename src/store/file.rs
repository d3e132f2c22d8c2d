//! File-backed key-value store: one `<key>.json` file per key

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::{KvStore, StoreError};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    /// Write with file locking and an atomic rename.
    ///
    /// 1. Exclusive lock prevents concurrent writers from interleaving
    /// 2. Content goes to a temp file which is synced and renamed over the target,
    ///    so readers see either the old or the new value, never a partial one
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let path = self.path_for(key);

        // Lock file is separate from the data file so the rename cannot drop it
        let lock_path = path.with_extension("json.lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| StoreError::io(&lock_path, e))?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StoreError::io(&lock_path, e))?;

        let temp_path = path.with_extension("json.tmp");
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| StoreError::io(&temp_path, e))?;
        temp_file
            .write_all(value.as_bytes())
            .map_err(|e| StoreError::io(&temp_path, e))?;
        temp_file
            .sync_all()
            .map_err(|e| StoreError::io(&temp_path, e))?;

        std::fs::rename(&temp_path, &path).map_err(|e| StoreError::io(&path, e))?;

        // Lock is released when lock_file is dropped
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("nothing").unwrap(), None);
        store.remove("nothing").unwrap();
    }

    #[test]
    fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        store.set("state", "{\"a\":1}").unwrap();
        assert_eq!(store.get("state").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(!dir.path().join("nested/state.json.tmp").exists());

        store.set("state", "{\"a\":2}").unwrap();
        assert_eq!(store.get("state").unwrap().as_deref(), Some("{\"a\":2}"));

        store.remove("state").unwrap();
        assert_eq!(store.get("state").unwrap(), None);
    }
}
