//! Error type shared by the deploy and destroy workflows.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("could not read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{what} not found in {path}")]
    ValueNotFound { what: String, path: PathBuf },
    #[error("private key file not found at {0}")]
    MissingPrivateKey(PathBuf),
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("could not parse output of `{command}`: {message}")]
    Parse { command: String, message: String },
}

impl InfraError {
    /// True for errors raised before any external command ran.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            InfraError::Unreadable { .. }
                | InfraError::ValueNotFound { .. }
                | InfraError::MissingPrivateKey(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, InfraError>;
