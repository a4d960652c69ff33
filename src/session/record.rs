use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::args::ArgMap;

/// Lifecycle status of a module within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Setup has not succeeded or failed yet.
    #[default]
    Idle,
    /// Setup succeeded; the module runs on every call.
    Run,
    /// Setup failed; the module is inactive for the rest of the session.
    Fail,
}

/// Per-module state owned by the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Arguments persisted across invocations.
    #[serde(default)]
    pub stored_args: ArgMap,
    /// Values published for other modules to look up.
    #[serde(default)]
    pub results: BTreeMap<String, Value>,
    #[serde(default)]
    pub status: Status,
}
