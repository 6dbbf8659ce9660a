//! Embedded `sled` backend

use super::KeyValueStore;
use crate::error::{GramcheckError, Result};
use sled::Db;
use std::path::Path;

/// Key-value store kept in an embedded `sled` database
pub struct SledStore {
    db: Db,
}

impl SledStore {
    /// Open or create a store at `path`
    ///
    /// # Errors
    ///
    /// Returns `GramcheckError::Storage` if the database cannot be opened
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| GramcheckError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| GramcheckError::Backend(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let value = String::from_utf8(bytes.to_vec())
                    .map_err(|e| GramcheckError::Backend(format!("Value is not UTF-8: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| GramcheckError::Backend(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| GramcheckError::Backend(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| GramcheckError::Backend(format!("Remove failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| GramcheckError::Backend(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}
