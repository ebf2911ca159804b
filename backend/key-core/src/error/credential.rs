//! Error types for reading the long-lived API key.

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CredentialError {
    #[error("Missing Credential Error: {variable} is not set {location}")]
    Missing {
        variable: String,
        location: ErrorLocation,
    },

    #[error("Missing Credential Error: {variable} contains invalid unicode {location}")]
    NotUnicode {
        variable: String,
        location: ErrorLocation,
    },
}

impl CredentialError {
    #[track_caller]
    pub fn missing(variable: impl Into<String>) -> Self {
        CredentialError::Missing {
            variable: variable.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_unicode(variable: impl Into<String>) -> Self {
        CredentialError::NotUnicode {
            variable: variable.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Name of the environment variable that was expected to hold the key.
    pub fn variable(&self) -> &str {
        match self {
            CredentialError::Missing { variable, .. } => variable,
            CredentialError::NotUnicode { variable, .. } => variable,
        }
    }
}
