//! Error types for the color-name dictionary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading dictionaries or parsing query colors.
///
/// Malformed dictionary lines are not errors: they are skipped during loading.
/// An empty lookup result is not an error either.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// A dictionary file could not be opened or read.
    #[error("dictionary source unavailable: {}: {reason}", .path.display())]
    SourceUnavailable { path: PathBuf, reason: String },

    /// A built-in source id does not correspond to any shipped dictionary.
    #[error("unknown built-in dictionary: {0}")]
    UnknownBuiltIn(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// The dictionary configuration had an unexpected shape.
    #[error("invalid dictionary configuration: {0}")]
    InvalidConfig(String),
}

impl DictionaryError {
    /// Builds a `SourceUnavailable` error from an I/O failure on `path`.
    pub fn unavailable(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        DictionaryError::SourceUnavailable {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
