//! Error types for ormharness

use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for harness operations
#[derive(Error, Debug)]
pub enum Error {
    /// A driver or dialect id that the registry does not know
    #[error("Unknown {kind} variant '{id}' (valid: {})", .valid.join(", "))]
    UnknownVariant {
        kind: &'static str,
        id: String,
        valid: Vec<&'static str>,
    },

    /// Workspace clone/update or dependency fetch failed
    #[error("Workspace sync failed: '{command}' exited with code {code}")]
    Sync { command: String, code: i32 },

    /// Build tool or report viewer exited non-zero
    #[error("Command '{command}' exited with code {code}")]
    ExternalProcess { command: String, code: i32 },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// WalkDir error
    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Atomic file replacement failed
    #[error("Cannot persist file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Regex error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

impl Error {
    /// Create an unknown variant error
    pub fn unknown_variant(kind: &'static str, id: impl Into<String>, valid: &[&'static str]) -> Self {
        Error::UnknownVariant {
            kind,
            id: id.into(),
            valid: valid.to_vec(),
        }
    }

    /// Create a sync error
    pub fn sync_error(command: impl Into<String>, code: i32) -> Self {
        Error::Sync {
            command: command.into(),
            code,
        }
    }

    /// Create an external process error
    pub fn process_error(command: impl Into<String>, code: i32) -> Self {
        Error::ExternalProcess {
            command: command.into(),
            code,
        }
    }

    /// Exit status the CLI should report for this error
    ///
    /// Failing external commands propagate their own code; everything raised
    /// by the harness itself maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Sync { code, .. } | Error::ExternalProcess { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}
