//! Command line tokenizer.

use thiserror::Error;

/// The line could not be split into words.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct LexError {
    pub reason: String,
}

/// Splits a raw line into argument words.
pub trait ShellLexer: Send + Sync {
    fn tokenize(&self, line: &str) -> Result<Vec<String>, LexError>;
}

/// POSIX-style quoting via `shell-words`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellWords;

impl ShellLexer for ShellWords {
    fn tokenize(&self, line: &str) -> Result<Vec<String>, LexError> {
        shell_words::split(line).map_err(|e| LexError {
            reason: e.to_string(),
        })
    }
}
