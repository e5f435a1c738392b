//! Key/value persistence for upgrade levels and coins.
//!
//! The store is loaded once and treated as infallible by its callers: reads
//! fall back to the supplied default and write failures are logged, never
//! returned.  [`TomlFileStore`] keeps a flat TOML table on disk;
//! [`MemoryStore`] backs headless tests.

use crate::error::{SimError, SimResult};
use bevy::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default on-disk location of the progress store.
pub const PROGRESS_PATH: &str = "saves/progress.toml";

/// Synchronous integer key/value store.
pub trait KeyValueStore: Send + Sync {
    fn get_int(&self, key: &str, default: i64) -> i64;
    fn set_int(&mut self, key: &str, value: i64);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, i64>,
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }
}

/// Flat `key = integer` TOML file, rewritten on every `set_int`.
#[derive(Debug, Clone)]
pub struct TomlFileStore {
    path: PathBuf,
    values: BTreeMap<String, i64>,
}

impl TomlFileStore {
    /// Load `path` once.  A missing file starts empty; a corrupt file is
    /// logged and also starts empty (it is overwritten on the next write).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match read_table(&path) {
            Ok(values) => values,
            Err(SimError::Io { .. }) => BTreeMap::new(),
            Err(err) => {
                warn!("{err}; starting with an empty progress store");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn flush(&self) -> SimResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| SimError::Io {
                path: dir.display().to_string(),
                source,
            })?;
        }
        let serialized = toml::to_string(&self.values).map_err(|err| SimError::Parse {
            path: self.path.display().to_string(),
            message: err.to_string(),
        })?;
        fs::write(&self.path, serialized).map_err(|source| SimError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }
}

fn read_table(path: &Path) -> SimResult<BTreeMap<String, i64>> {
    let contents = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&contents).map_err(|err| SimError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

impl KeyValueStore for TomlFileStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
        if let Err(err) = self.flush() {
            error!("Failed to persist '{key}': {err}");
        }
    }
}

/// Resource wrapper that injects a store into systems.
#[derive(Resource)]
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("sinkhole-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn memory_store_returns_default_for_missing_key() {
        let mut store = MemoryStore::default();
        assert_eq!(store.get_int("wallet.coins", 7), 7);
        store.set_int("wallet.coins", 42);
        assert_eq!(store.get_int("wallet.coins", 7), 42);
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = temp_store_path("reopen.toml");
        let _ = fs::remove_file(&path);
        {
            let mut store = TomlFileStore::open(&path);
            store.set_int("ability.magnet.level", 3);
            store.set_int("wallet.coins", 250);
        }
        let reopened = TomlFileStore::open(&path);
        assert_eq!(reopened.get_int("ability.magnet.level", 0), 3);
        assert_eq!(reopened.get_int("wallet.coins", 0), 250);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let path = temp_store_path("corrupt.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "this is = = not toml").unwrap();
        let store = TomlFileStore::open(&path);
        assert_eq!(store.get_int("wallet.coins", -1), -1);
        let _ = fs::remove_file(&path);
    }
}
