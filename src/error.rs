//! Error types for module invocation and registration.
//!
//! User-input failures are values returned to the host, which logs them and
//! renders help. Developer failures (a module defined without a description)
//! abort module construction.

use thiserror::Error;

/// Errors produced while registering or invoking a module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    /// A flag was not recognized, was ambiguous or lacked its value.
    #[error("{diagnostic}")]
    InvalidOptions { diagnostic: String },

    /// Fewer positional tokens than declared mandatory arguments.
    #[error("missing arguments, expected: {}", expected.join(" "))]
    MissingArguments { expected: Vec<String> },

    /// More positional tokens than the module can consume.
    #[error("unexpected arguments: {}", extra.join(" "))]
    UnexpectedArguments { extra: Vec<String> },

    /// The argument bound to the vector list names an unknown vector.
    #[error("argument '{argument}' must be a vector name, got '{value}'")]
    NotAVector { argument: String, value: String },

    /// The module failed its setup earlier in this session.
    #[error("module '{module}' is inactive")]
    ModuleInactive { module: String },

    /// The module has neither an explicit description nor documentation.
    #[error("module '{module}' is missing a description")]
    MissingDescription { module: String },

    /// The command line could not be split into words.
    #[error("error parsing command: {reason}")]
    Lexing { reason: String },
}

impl ModuleError {
    /// Whether the host should render the module help after this error.
    pub fn shows_help(&self) -> bool {
        matches!(
            self,
            Self::InvalidOptions { .. }
                | Self::MissingArguments { .. }
                | Self::UnexpectedArguments { .. }
        )
    }

    /// Whether the error points at a defect in the module definition rather
    /// than at user input.
    pub fn is_developer_error(&self) -> bool {
        matches!(self, Self::MissingDescription { .. })
    }
}
