use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Parse Error: {variable}: {reason} {location}")]
    Parse {
        location: ErrorLocation,
        variable: String,
        reason: String,
    },

    #[error("Config Validation Error: {reason} {location}")]
    Validation {
        location: ErrorLocation,
        reason: String,
    },
}

impl ConfigError {
    #[track_caller]
    pub fn parse(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Parse {
            location: ErrorLocation::from(Location::caller()),
            variable: variable.into(),
            reason: reason.into(),
        }
    }

    #[track_caller]
    pub fn validation(reason: impl Into<String>) -> Self {
        ConfigError::Validation {
            location: ErrorLocation::from(Location::caller()),
            reason: reason.into(),
        }
    }
}
