//! Session persistence.
//!
//! Sessions are written as pretty JSON. Writes go to a sibling temp file
//! first and are renamed into place.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{ModuleRecord, Session};

/// Errors that can occur when loading or saving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read session file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write session file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse session file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Serializable copy of a whole session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: String,
    #[serde(default)]
    pub globals: BTreeMap<String, Value>,
    #[serde(default)]
    pub records: BTreeMap<String, ModuleRecord>,
}

impl Session {
    /// Copy the current state of every record.
    pub fn snapshot(&self) -> SessionSnapshot {
        let records = self
            .records
            .read()
            .iter()
            .map(|(name, record)| (name.clone(), record.lock().clone()))
            .collect();

        SessionSnapshot {
            id: self.id.clone(),
            globals: self.globals.read().clone(),
            records,
        }
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let records = snapshot
            .records
            .into_iter()
            .map(|(name, record)| (name, Arc::new(Mutex::new(record))))
            .collect();

        Self {
            id: snapshot.id,
            records: RwLock::new(records),
            globals: RwLock::new(snapshot.globals),
        }
    }

    /// Load a session from `path`.
    ///
    /// A missing file yields a fresh session.
    pub fn load_from(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No session file, starting a new session");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|e| SessionError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let snapshot: SessionSnapshot =
            serde_json::from_str(&content).map_err(|e| SessionError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!(
            path = %path.display(),
            session = %snapshot.id,
            modules = snapshot.records.len(),
            "Session loaded"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Write the session to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), SessionError> {
        let write_err = |e: std::io::Error| SessionError::Write {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = serde_json::to_string_pretty(&self.snapshot()).map_err(|e| {
            SessionError::Write {
                path: path.to_path_buf(),
                source: e.into(),
            }
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(write_err)?;
        fs::rename(&tmp, path).map_err(write_err)?;

        tracing::debug!(path = %path.display(), session = %self.id, "Session saved");
        Ok(())
    }
}

/// Default location of the session file.
pub fn default_session_path() -> PathBuf {
    let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data_dir.join("modshell").join("session.json")
}
