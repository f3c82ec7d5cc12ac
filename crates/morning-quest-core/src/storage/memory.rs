//! In-process store for tests and throwaway sessions.
//!
//! Values are kept as serialized JSON, the same bytes `SqliteStore` writes,
//! so decoding failures behave identically.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::database::CURRENT_HERO_KEY;
use super::snapshot::{RoutineSnapshot, RoutineStore};
use crate::error::Result;
use crate::routine::{Identity, IdentityKey};

/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    kv: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value, for inspection in tests.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Overwrite a raw value, bypassing serialization.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.kv.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RoutineStore for MemoryStore {
    fn load(&self, key: &IdentityKey) -> Result<Option<RoutineSnapshot>> {
        match self.raw(key.as_str()) {
            Some(json) => Ok(Some(RoutineSnapshot::decode(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, key: &IdentityKey, snapshot: &RoutineSnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        self.insert_raw(key.as_str(), &json);
        Ok(())
    }

    fn current_identity(&self) -> Result<Option<Identity>> {
        match self.raw(CURRENT_HERO_KEY) {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn set_current_identity(&self, identity: Option<&Identity>) -> Result<()> {
        match identity {
            Some(identity) => {
                let json = serde_json::to_string(identity)?;
                self.insert_raw(CURRENT_HERO_KEY, &json);
            }
            None => {
                self.lock().remove(CURRENT_HERO_KEY);
            }
        }
        Ok(())
    }
}
