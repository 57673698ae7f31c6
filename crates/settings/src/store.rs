// Key-value storage for settings and UI state
// Injected into the host UI instead of reaching for ambient global storage.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;
use crate::model::AppSettings;
use crate::normalize::normalize;

/// Key under which the serialized settings are kept
pub const SETTINGS_KEY: &str = "sovendus.settings";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;
    fn remove(&mut self, key: &str) -> Result<(), SettingsError>;
}

/// In-memory store (tests, previews)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file, rewritten on every change
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Default location: `<config dir>/sovendus/ui-state.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sovendus")
            .join("ui-state.json")
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|e| SettingsError::Store(format!("{}: {e}", path.display())))?;
            serde_json::from_str(&contents)
                .map_err(|e| SettingsError::Store(format!("{}: {e}", path.display())))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn open_default() -> Result<Self, SettingsError> {
        Self::open(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SettingsError::Store(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| SettingsError::Store(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| SettingsError::Store(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Settings load / persist
// ---------------------------------------------------------------------------

/// Load and normalize the settings under `key`, falling back to defaults
pub fn load_settings(store: &impl KeyValueStore, key: &str) -> AppSettings {
    let json = match store.get(key) {
        Ok(Some(json)) => json,
        Ok(None) => return AppSettings::default(),
        Err(e) => {
            log::warn!("Error reading stored settings: {e}");
            return AppSettings::default();
        }
    };

    match normalize(json) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Error parsing stored settings ({e}), using defaults");
            AppSettings::default()
        }
    }
}

pub fn persist_settings(store: &mut impl KeyValueStore, key: &str, settings: &AppSettings) -> Result<(), SettingsError> {
    let json = settings.to_json().map_err(|e| SettingsError::Store(e.to_string()))?;
    store.set(key, &json)
}
