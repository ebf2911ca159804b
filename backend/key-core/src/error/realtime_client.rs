//! Error types for the client-secrets HTTP call.
//!
//! Connection and timeout failures are separated from everything else by
//! inspecting the `reqwest::Error` before it is turned into a string.

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RealtimeClientError {
    #[error("Connection Error: {message} {location}")]
    Connection {
        message: String,
        location: ErrorLocation,
    },

    #[error("Timeout Error: {message} {location}")]
    Timeout {
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },
}

impl RealtimeClientError {
    /// Message without the kind prefix or location suffix.
    pub fn detail(&self) -> String {
        match self {
            RealtimeClientError::Connection { message, .. }
            | RealtimeClientError::Timeout { message, .. }
            | RealtimeClientError::Http { message, .. } => message.clone(),
        }
    }
}

impl From<reqwest::Error> for RealtimeClientError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        let location = ErrorLocation::from(Location::caller());

        // Timeout first: a connect that times out reports both flags
        if error.is_timeout() {
            return RealtimeClientError::Timeout {
                message: error.to_string(),
                location,
            };
        }

        if error.is_connect() {
            return RealtimeClientError::Connection {
                message: error.to_string(),
                location,
            };
        }

        RealtimeClientError::Http {
            message: error.to_string(),
            location,
        }
    }
}
