//! Session store.
//!
//! A `Session` owns one `ModuleRecord` per module name. Module hosts share the
//! session through an `Arc` and hold a handle to their own record; each record
//! sits behind its own mutex so invocations of the same module serialize.

mod persist;
mod record;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;

pub use persist::{default_session_path, SessionError, SessionSnapshot};
pub use record::{ModuleRecord, Status};

/// Shared handle to one module's record.
pub type SharedRecord = Arc<Mutex<ModuleRecord>>;

/// Session state shared by every module host.
pub struct Session {
    id: String,
    records: RwLock<HashMap<String, SharedRecord>>,
    globals: RwLock<BTreeMap<String, Value>>,
}

impl Session {
    /// Create an empty session with a fresh id.
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            records: RwLock::new(HashMap::new()),
            globals: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the record for `name`, creating an idle one if absent.
    pub fn ensure(&self, name: &str) -> SharedRecord {
        if let Some(record) = self.records.read().get(name) {
            return record.clone();
        }

        let mut records = self.records.write();
        records
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(session = %self.id, module = %name, "Module record created");
                Arc::new(Mutex::new(ModuleRecord::default()))
            })
            .clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.read().contains_key(name)
    }

    /// Snapshot of the record for `name`.
    pub fn get(&self, name: &str) -> Option<ModuleRecord> {
        self.records.read().get(name).map(|record| record.lock().clone())
    }

    /// Replace the whole record for `name`.
    ///
    /// Hosts already holding a handle observe the new contents.
    pub fn set(&self, name: &str, record: ModuleRecord) {
        let handle = self.ensure(name);
        *handle.lock() = record;
    }

    /// Names of all records, sorted.
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// A result published by `module`.
    ///
    /// Locks that module's record; do not call it for a module whose record
    /// the caller already holds.
    pub fn result(&self, module: &str, field: &str) -> Option<Value> {
        let record = self.records.read().get(module).cloned()?;
        let result = record.lock().results.get(field).cloned();
        result
    }

    /// A session-level value not owned by any module.
    pub fn global(&self, key: &str) -> Option<Value> {
        self.globals.read().get(key).cloned()
    }

    pub fn set_global(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.globals.write().insert(key.into(), value.into());
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
