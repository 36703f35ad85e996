//! Durable key-value storage for the session token.
//!
//! The client only ever persists two keys: the opaque auth token and the
//! time it was issued. Anything else about the session is rebuilt from the
//! backend on startup via a token check.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use crate::error::{AgendaError, AgendaResult};

pub const TOKEN_KEY: &str = "token";
pub const TOKEN_INIT_DATE_KEY: &str = "token-init-date";

/// String key-value storage shared by every store in the process.
///
/// There is no locking across keys; the last writer wins.
pub trait TokenStorage: Send + Sync {
    fn get(&self, key: &str) -> AgendaResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AgendaResult<()>;
    fn remove(&self, key: &str) -> AgendaResult<()>;

    /// Persist a freshly issued token together with its issue date (ms since epoch).
    fn save_token(&self, token: &str) -> AgendaResult<()> {
        self.set(TOKEN_KEY, token)?;
        self.set(TOKEN_INIT_DATE_KEY, &Utc::now().timestamp_millis().to_string())
    }

    fn token(&self) -> AgendaResult<Option<String>> {
        self.get(TOKEN_KEY)
    }

    fn clear_token(&self) -> AgendaResult<()> {
        self.remove(TOKEN_KEY)?;
        self.remove(TOKEN_INIT_DATE_KEY)
    }
}

/// In-process storage. Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> AgendaResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AgendaResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AgendaResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Storage backed by a small TOML file, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> AgendaResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            AgendaError::Storage(format!("Failed to parse {}: {e}", self.path.display()))
        })
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> AgendaResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(entries).map_err(|e| AgendaError::Serialization(e.to_string()))?;

        let temp = self.path.with_extension("toml.tmp");
        std::fs::write(&temp, content)?;

        // Owner-only (0600) since the file holds an auth token:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&temp, std::fs::Permissions::from_mode(0o600))?;
        }

        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> AgendaResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read()?;
        f(&mut entries);
        self.write(&entries)
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> AgendaResult<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> AgendaResult<()> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> AgendaResult<()> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }
}
