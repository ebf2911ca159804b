//! Error types for rewriting the key literal in the patch target.
//!
//! None of these abort a run. They are reported as warnings and the
//! operator is told to copy the key by hand.

use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("Patch Read Error: {path}: {source} {location}")]
    Read {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Patch Write Error: {path}: {source} {location}")]
    Write {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Patch Pattern Error: {reason} {location}")]
    Pattern {
        location: ErrorLocation,
        reason: String,
    },

    #[error("Patch Unsafe Key Error: key contains {character:?}, which cannot appear in a single-quoted literal {location}")]
    UnsafeKey {
        location: ErrorLocation,
        character: char,
    },
}

impl PatchError {
    /// Underlying cause without the location suffix, for console output.
    pub fn detail(&self) -> String {
        match self {
            PatchError::Read { path, source, .. } => format!("{}: {source}", path.display()),
            PatchError::Write { path, source, .. } => format!("{}: {source}", path.display()),
            PatchError::Pattern { reason, .. } => reason.clone(),
            PatchError::UnsafeKey { character, .. } => {
                format!("key contains {character:?}, which cannot appear in a single-quoted literal")
            }
        }
    }
}
