use crate::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// Raised when a secret wrapper is asked to leave its redacted form.
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Redacted Serialization Error: {type_name} refuses to serialize {location}")]
    Serialization {
        type_name: &'static str,
        location: ErrorLocation,
    },
}

impl RedactError {
    #[track_caller]
    pub fn serialization(type_name: &'static str) -> Self {
        RedactError::Serialization {
            type_name,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
