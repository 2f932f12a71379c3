//! Core PlanStore implementation

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Record already exists: {collection}/{id}")]
    AlreadyExists { collection: String, id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A record that can be stored in a PlanStore collection
///
/// The collection name is a property of the type, not the instance, so a
/// store can never mix record kinds within one directory.
pub trait Record: Serialize + DeserializeOwned {
    /// Unique identifier within the collection (becomes the file name)
    fn id(&self) -> &str;

    /// Collection (directory) this record type lives in
    fn collection() -> &'static str;
}

/// File-backed JSON document store
///
/// Layout: `<base>/<collection>/<id>.json`. Records are written atomically
/// via a temp file and rename in the same directory.
pub struct PlanStore {
    base_path: PathBuf,
}

impl PlanStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        debug!(?base_path, "Opened plan store");
        Ok(Self { base_path })
    }

    /// Base path of this store
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn record_path<T: Record>(&self, id: &str) -> PathBuf {
        self.base_path.join(T::collection()).join(format!("{id}.json"))
    }

    /// Write a record, creating or replacing it
    pub fn put<T: Record>(&self, record: &T) -> Result<(), StoreError> {
        let path = self.record_path::<T>(record.id());
        self.write_atomic(&path, record)?;
        debug!(collection = T::collection(), id = record.id(), "put: wrote record");
        Ok(())
    }

    /// Write a record that must not already exist (append-only collections)
    pub fn put_new<T: Record>(&self, record: &T) -> Result<(), StoreError> {
        let path = self.record_path::<T>(record.id());
        if path.exists() {
            return Err(StoreError::AlreadyExists {
                collection: T::collection().to_string(),
                id: record.id().to_string(),
            });
        }
        self.write_atomic(&path, record)?;
        info!(collection = T::collection(), id = record.id(), "put_new: wrote record");
        Ok(())
    }

    /// Read a record, failing if it does not exist
    pub fn get<T: Record>(&self, id: &str) -> Result<T, StoreError> {
        self.try_get(id)?.ok_or_else(|| StoreError::NotFound {
            collection: T::collection().to_string(),
            id: id.to_string(),
        })
    }

    /// Read a record if it exists
    pub fn try_get<T: Record>(&self, id: &str) -> Result<Option<T>, StoreError> {
        let path = self.record_path::<T>(id);
        if !path.exists() {
            debug!(collection = T::collection(), %id, "try_get: no record");
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let record = serde_json::from_str(&content)?;
        Ok(Some(record))
    }

    /// List all records in a collection, ordered by file name
    ///
    /// File-name ordering makes listing deterministic; callers that key
    /// records by timestamp get chronological order for free.
    pub fn list<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        let dir = self.base_path.join(T::collection());
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map(|e| e == "json").unwrap_or(false))
            .collect();
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let content = fs::read_to_string(&path)?;
            records.push(serde_json::from_str(&content)?);
        }
        debug!(collection = T::collection(), count = records.len(), "list: loaded records");
        Ok(records)
    }

    /// Check whether a record exists
    pub fn exists<T: Record>(&self, id: &str) -> bool {
        self.record_path::<T>(id).exists()
    }

    /// Delete a record if present
    pub fn delete<T: Record>(&self, id: &str) -> Result<(), StoreError> {
        let path = self.record_path::<T>(id);
        if path.exists() {
            fs::remove_file(&path)?;
            info!(collection = T::collection(), %id, "Deleted record");
        }
        Ok(())
    }

    /// Serialize to a temp file next to the target, then rename over it
    fn write_atomic<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let dir = path.parent().expect("record path always has a parent");
        fs::create_dir_all(dir)?;

        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(value)?;
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Widget {
        id: String,
        size: u32,
    }

    impl Record for Widget {
        fn id(&self) -> &str {
            &self.id
        }

        fn collection() -> &'static str {
            "widgets"
        }
    }

    fn widget(id: &str, size: u32) -> Widget {
        Widget {
            id: id.to_string(),
            size,
        }
    }

    #[test]
    fn test_put_and_get_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        store.put(&widget("w1", 10)).unwrap();
        let loaded: Widget = store.get("w1").unwrap();
        assert_eq!(loaded, widget("w1", 10));
    }

    #[test]
    fn test_put_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        store.put(&widget("w1", 10)).unwrap();
        store.put(&widget("w1", 20)).unwrap();

        let loaded: Widget = store.get("w1").unwrap();
        assert_eq!(loaded.size, 20);
    }

    #[test]
    fn test_put_new_rejects_duplicate() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        store.put_new(&widget("w1", 10)).unwrap();
        let result = store.put_new(&widget("w1", 20));
        assert!(matches!(result, Err(StoreError::AlreadyExists { .. })));

        // Original untouched
        let loaded: Widget = store.get("w1").unwrap();
        assert_eq!(loaded.size, 10);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        let result = store.get::<Widget>("nope");
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
        assert!(store.try_get::<Widget>("nope").unwrap().is_none());
    }

    #[test]
    fn test_list_is_ordered_by_id() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        store.put(&widget("b", 2)).unwrap();
        store.put(&widget("a", 1)).unwrap();
        store.put(&widget("c", 3)).unwrap();

        let all: Vec<Widget> = store.list().unwrap();
        let ids: Vec<&str> = all.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_list_empty_collection() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        let all: Vec<Widget> = store.list().unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_delete_and_exists() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        store.put(&widget("w1", 10)).unwrap();
        assert!(store.exists::<Widget>("w1"));

        store.delete::<Widget>("w1").unwrap();
        assert!(!store.exists::<Widget>("w1"));

        // Deleting a missing record is fine
        store.delete::<Widget>("w1").unwrap();
    }

    #[test]
    fn test_no_tmp_files_left_behind() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        store.put(&widget("w1", 10)).unwrap();

        let dir = temp.path().join("widgets");
        let leftovers: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());
    }
}
