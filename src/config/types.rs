use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub help: HelpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the session lives and when it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session file (default: data dir `modshell/session.json`).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Save the session when the shell exits (default: true).
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

/// Help rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelpConfig {
    /// Tera template replacing the built-in help layout.
    #[serde(default)]
    pub template: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn or error (default: info).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Write logs to this file instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_autosave() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: None,
            autosave: default_autosave(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}
