use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

/// Errors of the binary itself.
///
/// Fetch outcomes are not errors at this level: they are rendered to the
/// console and the run completes. These cover the plumbing around it.
#[derive(Debug, Error)]
pub enum AppError {
    /// Writing the console report failed (closed stdout, full pipe).
    #[error("Console Error: {message} {location}")]
    Console {
        message: String,
        location: ErrorLocation,
    },

    #[error("Logger Error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(error: std::io::Error) -> Self {
        AppError::Console {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
