//! Outcome errors of a single fetch run.
//!
//! Each variant maps to one console message. All of them are recoverable:
//! the run prints a diagnostic and ends with exit status 0.

use crate::error::RealtimeClientError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum FetchError {
    /// The endpoint answered with something other than 200.
    #[error("Rejected: HTTP {status} - {body} {location}")]
    Rejected {
        status: HttpStatusCode,
        body: String,
        location: ErrorLocation,
    },

    #[error("Connection failed: {message} {location}")]
    Connection {
        message: String,
        location: ErrorLocation,
    },

    #[error("Request timed out: {message} {location}")]
    Timeout {
        message: String,
        location: ErrorLocation,
    },

    /// Anything else. `status` is set when the failure happened after a
    /// response arrived (unparseable body). `message` carries no source
    /// location so it can be shown to the operator.
    #[error("Fetch failed: {message} {location}")]
    Unknown {
        message: String,
        status: Option<HttpStatusCode>,
        location: ErrorLocation,
    },
}

impl FetchError {
    #[track_caller]
    pub fn rejected(status: HttpStatusCode, body: impl Into<String>) -> Self {
        FetchError::Rejected {
            status,
            body: body.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown(message: impl Into<String>, status: Option<HttpStatusCode>) -> Self {
        FetchError::Unknown {
            message: message.into(),
            status,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Stable label for log lines.
    pub fn category(&self) -> &'static str {
        match self {
            FetchError::Rejected { status, .. } if status.is_client_error() => "client_error",
            FetchError::Rejected { status, .. } if status.is_server_error() => "server_error",
            FetchError::Rejected { .. } => "http_error",
            FetchError::Connection { .. } => "connection",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Unknown { .. } => "unknown",
        }
    }

    /// Status code of the response, if one arrived before the failure.
    pub fn status_code(&self) -> Option<HttpStatusCode> {
        match self {
            FetchError::Rejected { status, .. } => Some(*status),
            FetchError::Unknown { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<RealtimeClientError> for FetchError {
    #[track_caller]
    fn from(error: RealtimeClientError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match error {
            RealtimeClientError::Connection { message, .. } => {
                FetchError::Connection { message, location }
            }
            RealtimeClientError::Timeout { message, .. } => {
                FetchError::Timeout { message, location }
            }
            other => FetchError::Unknown {
                message: other.detail(),
                status: None,
                location,
            },
        }
    }
}
