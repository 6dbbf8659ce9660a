//! Directory-backed store: one file per key

use super::KeyValueStore;
use crate::error::{GramcheckError, Result};
use anyhow::Context;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value store keeping each key in its own file under a directory
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so readers see either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`
    ///
    /// # Errors
    ///
    /// Returns `GramcheckError::Storage` if the directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```
    /// use gramcheck::storage::{FileStore, KeyValueStore};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = FileStore::new(dir.path().join("kv")).unwrap();
    /// store.set("greeting", "hello").unwrap();
    /// assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello"));
    /// ```
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .context("Failed to create storage directory")
            .map_err(|e| GramcheckError::Storage(e.to_string()))?;
        Ok(Self { dir })
    }

    /// Directory holding the key files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_name_for(key)))
    }
}

/// Map a key to a file-system safe stem
///
/// Distinct keys can share a stem (`a/b` and `a_b`).
pub fn file_name_for(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GramcheckError::Backend(format!("Read of {} failed: {}", key, e)).into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.tmp", file_name_for(key)));

        fs::write(&tmp, value)
            .map_err(|e| GramcheckError::Backend(format!("Write of {} failed: {}", key, e)))?;

        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(GramcheckError::Backend(format!("Rename of {} failed: {}", key, e)).into());
        }

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(GramcheckError::Backend(format!("Remove of {} failed: {}", key, e)).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_store() -> (FileStore, tempfile::TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let store = FileStore::new(dir.path().join("kv")).expect("failed to create store");
        (store, dir)
    }

    #[test]
    fn test_new_creates_nested_directory() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(&nested).expect("new");
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn test_get_missing_key_returns_none() {
        let (store, _dir) = create_test_store();
        assert_eq!(store.get("nope").expect("get"), None);
    }

    #[test]
    fn test_set_overwrites_and_leaves_no_temp_file() {
        let (store, _dir) = create_test_store();
        store.set("sessions", "first").expect("set 1");
        store.set("sessions", "second").expect("set 2");
        assert_eq!(store.get("sessions").expect("get").as_deref(), Some("second"));

        let leftovers: Vec<_> = fs::read_dir(store.dir())
            .expect("read_dir")
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_keys_with_separators_stay_inside_dir() {
        let (store, _dir) = create_test_store();
        store.set("../escape/key", "v").expect("set");
        assert!(store.dir().join(".._escape_key.json").exists());
        assert_eq!(store.get("../escape/key").expect("get").as_deref(), Some("v"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (store, _dir) = create_test_store();
        store.set("k", "v").expect("set");
        store.remove("k").expect("first remove");
        store.remove("k").expect("second remove");
        assert_eq!(store.get("k").expect("get"), None);
    }
}
