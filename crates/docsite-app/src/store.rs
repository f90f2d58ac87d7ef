//! Preference store (the site's cookie jar)
//!
//! Controllers never see the whole store: each gets a [`ScopedStore`] that
//! only admits the keys it owns. Reads and writes are atomic per key and the
//! last write wins.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use docsite_core::prelude::*;
use docsite_core::PickerKind;
use fs2::FileExt;

use crate::config::DOCSITE_DIR;

/// Locale cookie
pub const LOCALE_KEY: &str = "locale";

/// Version cookie, shared by the version picker and the negotiator
pub const VERSION_KEY: &str = "version";

/// Keys the picker state manager may touch
pub const PICKER_KEYS: &[&str] = &["platform", "tool", "language", VERSION_KEY];

/// Keys the locale/version negotiator may touch
pub const NEGOTIATOR_KEYS: &[&str] = &[LOCALE_KEY, VERSION_KEY];

const PREFERENCES_FILENAME: &str = "preferences.toml";

/// Store key for a picker kind
pub fn picker_key(kind: PickerKind) -> &'static str {
    kind.as_str()
}

/// Cookie-like key/value store shared by every controller
pub trait PreferenceStore: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store (builder style)
    pub fn with(self, key: &str, value: &str) -> Self {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::store("memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::store("memory store lock poisoned"))?;
        values.remove(key);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File store
// ─────────────────────────────────────────────────────────────────────────────

/// TOML-backed store (`.docsite/preferences.toml`).
///
/// Every operation re-reads the file under an advisory lock, so several
/// engines pointed at the same directory share one set of cookies.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config_root>/.docsite/preferences.toml`
    pub fn in_config_root(config_root: &Path) -> Self {
        Self::new(config_root.join(DOCSITE_DIR).join(PREFERENCES_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let mut file = File::open(&self.path)?;
        FileExt::lock_shared(&file)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        // Lock released when `file` drops
        parse_preferences(&content)
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        FileExt::lock_exclusive(&file)?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        let mut prefs = parse_preferences(&content)?;
        f(&mut prefs);

        let out = toml::to_string(&prefs)
            .map_err(|e| Error::store(format!("Failed to serialize preferences: {}", e)))?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(out.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

fn parse_preferences(content: &str) -> Result<BTreeMap<String, String>> {
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    toml::from_str(content).map_err(|e| Error::store(format!("Invalid preferences file: {}", e)))
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(prefs) => prefs.get(key).cloned(),
            Err(e) => {
                warn!("Failed to read preferences from {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|prefs| {
            prefs.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|prefs| {
            prefs.remove(key);
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scoped view
// ─────────────────────────────────────────────────────────────────────────────

/// View of a shared store restricted to a fixed key list
#[derive(Clone)]
pub struct ScopedStore {
    inner: Arc<dyn PreferenceStore>,
    allowed: &'static [&'static str],
}

impl fmt::Debug for ScopedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedStore")
            .field("allowed", &self.allowed)
            .finish()
    }
}

impl ScopedStore {
    pub fn new(inner: Arc<dyn PreferenceStore>, allowed: &'static [&'static str]) -> Self {
        Self { inner, allowed }
    }

    pub fn pickers(inner: Arc<dyn PreferenceStore>) -> Self {
        Self::new(inner, PICKER_KEYS)
    }

    pub fn negotiator(inner: Arc<dyn PreferenceStore>) -> Self {
        Self::new(inner, NEGOTIATOR_KEYS)
    }

    pub fn allows(&self, key: &str) -> bool {
        self.allowed.contains(&key)
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.allows(key) {
            Ok(())
        } else {
            Err(Error::StoreScope {
                key: key.to_string(),
            })
        }
    }
}

impl PreferenceStore for ScopedStore {
    fn get(&self, key: &str) -> Option<String> {
        if !self.allows(key) {
            warn!("Read of preference '{}' outside store scope", key);
            return None;
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check(key)?;
        self.inner.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        assert_eq!(store.get("platform"), None);
        store.set("platform", "linux").unwrap();
        store.set("platform", "mac").unwrap();
        assert_eq!(store.get("platform").as_deref(), Some("mac"));
        store.remove("platform").unwrap();
        assert_eq!(store.get("platform"), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp = tempdir().unwrap();
        let store = FileStore::in_config_root(temp.path());
        store.set(LOCALE_KEY, "ja").unwrap();
        store.set("tool", "cli").unwrap();

        let reopened = FileStore::in_config_root(temp.path());
        assert_eq!(reopened.get(LOCALE_KEY).as_deref(), Some("ja"));
        assert_eq!(reopened.get("tool").as_deref(), Some("cli"));

        reopened.remove("tool").unwrap();
        assert_eq!(store.get("tool"), None);
        assert!(store.path().ends_with(".docsite/preferences.toml"));
    }

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let temp = tempdir().unwrap();
        let store = FileStore::in_config_root(temp.path());
        assert_eq!(store.get(LOCALE_KEY), None);
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let temp = tempdir().unwrap();
        let store = FileStore::in_config_root(temp.path());
        std::fs::create_dir_all(temp.path().join(DOCSITE_DIR)).unwrap();
        std::fs::write(store.path(), "not = [valid").unwrap();

        assert_eq!(store.get(LOCALE_KEY), None);
        let err = store.set(LOCALE_KEY, "en").unwrap_err();
        assert!(matches!(err, Error::Store { .. }));
    }

    #[test]
    fn test_scoped_store_rejects_foreign_keys() {
        let shared: Arc<dyn PreferenceStore> = Arc::new(MemoryStore::new().with(LOCALE_KEY, "ja"));
        let pickers = ScopedStore::pickers(shared.clone());
        let negotiator = ScopedStore::negotiator(shared.clone());

        assert_eq!(pickers.get(LOCALE_KEY), None);
        assert!(matches!(
            pickers.set(LOCALE_KEY, "en"),
            Err(Error::StoreScope { .. })
        ));
        assert_eq!(negotiator.get(LOCALE_KEY).as_deref(), Some("ja"));

        // Version is shared by both scopes
        pickers.set(VERSION_KEY, "enterprise-server@3.12").unwrap();
        assert_eq!(
            negotiator.get(VERSION_KEY).as_deref(),
            Some("enterprise-server@3.12")
        );
    }

    #[test]
    fn test_picker_key_matches_kind() {
        for kind in PickerKind::ALL {
            assert!(PICKER_KEYS.contains(&picker_key(kind)));
        }
    }
}
