use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::Result;

/// Target name → stored bytes
pub trait CacheStore {
    /// Bytes stored under `target`, `None` if nothing was stored
    fn load(&self, target: &str) -> Result<Option<Vec<u8>>>;

    /// Replace whatever is stored under `target`
    fn save(&mut self, target: &str, bytes: &[u8]) -> Result<()>;
}

/// Store rooted at the data directory; targets are relative file paths
#[derive(Debug, Clone)]
pub struct DataDirStore {
    root: PathBuf,
}

impl DataDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, target: &str) -> PathBuf {
        self.root.join(target)
    }

    pub fn read(&self, target: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(target)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn write(&self, target: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path_for(target);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)
    }
}

impl CacheStore for DataDirStore {
    fn load(&self, target: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read(target)?)
    }

    fn save(&mut self, target: &str, bytes: &[u8]) -> Result<()> {
        Ok(self.write(target, bytes)?)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` as JSON under `target`
    pub fn insert_json(&mut self, target: impl Into<String>, value: &Value) {
        self.entries.insert(target.into(), value.to_string().into_bytes());
    }

    pub fn insert_raw(&mut self, target: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(target.into(), bytes.into());
    }

    /// Decoded JSON stored under `target`
    pub fn get_json(&self, target: &str) -> Option<Value> {
        self.entries
            .get(target)
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
    }

    pub fn contains(&self, target: &str) -> bool {
        self.entries.contains_key(target)
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, target: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(target).cloned())
    }

    fn save(&mut self, target: &str, bytes: &[u8]) -> Result<()> {
        self.entries.insert(target.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn data_dir_missing_target_is_none() {
        let dir = TempDir::new().unwrap();
        let store = DataDirStore::new(dir.path());
        assert!(store.load("nothing.json").unwrap().is_none());
    }

    #[test]
    fn data_dir_save_creates_parents() {
        let dir = TempDir::new().unwrap();
        let mut store = DataDirStore::new(dir.path());
        store.save("cache/langs.json", b"{}").unwrap();
        assert_eq!(store.load("cache/langs.json").unwrap().as_deref(), Some(&b"{}"[..]));
        assert!(dir.path().join("cache/langs.json").exists());
    }

    #[test]
    fn memory_store_json_helpers() {
        let mut store = MemoryStore::new();
        store.insert_json("things.json", &json!([{"title": "x"}]));
        assert!(store.contains("things.json"));
        assert_eq!(store.get_json("things.json"), Some(json!([{"title": "x"}])));
        assert_eq!(store.get_json("missing"), None);
    }
}
