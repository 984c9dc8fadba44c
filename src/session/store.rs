use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::settings::CONFY_APP_NAME;

/// String key-value storage the selection is kept in.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Lives as long as the process, like a browser session.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    entries: BTreeMap<String, String>,
}

/// Write-through store backed by the confy config directory.
pub struct ConfyStore {
    config_name: &'static str,
    file: SessionFile,
}

impl ConfyStore {
    pub fn open(config_name: &'static str) -> Self {
        let file = confy::load(CONFY_APP_NAME, config_name).unwrap_or_else(|e| {
            log::warn!("Failed to read session store '{config_name}': {e}");
            SessionFile::default()
        });
        Self { config_name, file }
    }
}

impl SessionStore for ConfyStore {
    fn get(&self, key: &str) -> Option<String> {
        self.file.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.file.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = confy::store(CONFY_APP_NAME, self.config_name, &self.file) {
            log::warn!("Failed to persist session key '{key}': {e}");
        }
    }
}

/// Store picked at runtime from the `persist_selection` setting.
pub enum AnyStore {
    Memory(MemoryStore),
    Confy(ConfyStore),
}

impl AnyStore {
    pub fn for_selection(persist: bool) -> Self {
        if persist {
            AnyStore::Confy(ConfyStore::open("session"))
        } else {
            AnyStore::Memory(MemoryStore::new())
        }
    }
}

impl SessionStore for AnyStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            AnyStore::Memory(store) => store.get(key),
            AnyStore::Confy(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        match self {
            AnyStore::Memory(store) => store.set(key, value),
            AnyStore::Confy(store) => store.set(key, value),
        }
    }
}
