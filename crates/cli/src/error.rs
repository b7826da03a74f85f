//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: dictionary error (unknown built-in dictionary, nothing loaded)
//! - 11: I/O error (dictionary or config file unreadable)
//! - 12: input error (bad query color, bad config JSON)
//! - 13: serialization error

use color_names_core::DictionaryError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A dictionary-level error.
    Dictionary(DictionaryError),
    /// An I/O error reading a dictionary or configuration file.
    Io(String),
    /// A user input error (bad color, bad configuration).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Dictionary(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Dictionary(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<DictionaryError> for CliError {
    fn from(e: DictionaryError) -> Self {
        match e {
            e @ DictionaryError::SourceUnavailable { .. } => CliError::Io(e.to_string()),
            e @ (DictionaryError::InvalidColor(_) | DictionaryError::InvalidConfig(_)) => {
                CliError::Input(e.to_string())
            }
            other => CliError::Dictionary(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
