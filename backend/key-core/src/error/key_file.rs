use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyFileError {
    #[error("Key File Create Error: {path}: {source} {location}")]
    Create {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Key File Write Error: {path}: {source} {location}")]
    Write {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Key File Serialization Error: {path}: {reason} {location}")]
    Serialize {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },
}

impl KeyFileError {
    /// Underlying cause without the location suffix, for console output.
    pub fn detail(&self) -> String {
        match self {
            KeyFileError::Create { path, source, .. } | KeyFileError::Write { path, source, .. } => {
                format!("{}: {source}", path.display())
            }
            KeyFileError::Serialize { path, reason, .. } => format!("{}: {reason}", path.display()),
        }
    }
}
