use crate::backend::StorageBackend;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl StorageBackend for MemoryStorage {
    fn is_available(&self) -> bool {
        true
    }

    fn read(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn write(&self, key: &str, value: String) -> Result<(), String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}

/// Storage that is never there, e.g. when no persistent location was configured
/// and the caller wants a purely ephemeral store.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStorage;

impl StorageBackend for DisabledStorage {
    fn is_available(&self) -> bool {
        false
    }

    fn read(&self, key: &str) -> Option<String> {
        debug!(key, "Read from disabled storage");
        None
    }

    fn write(&self, key: &str, _value: String) -> Result<(), String> {
        debug!(key, "Write to disabled storage ignored");
        Ok(())
    }
}
