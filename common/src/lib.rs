//! Shared leaf types for the ephemeral key workspace.
//!
//! Nothing in here talks to the network or the filesystem. These are the
//! small value types every other crate passes around.
//!
//! ## Architecture
//!
//! - **common** (this crate): Error locations, secret wrapper, status codes
//! - **key-core**: Fetch pipeline operating on these types
//! - **ephemeral-key**: Binary wiring config, logging and console output

pub mod error;
pub mod http_status;
pub mod redacted_key;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_key::RedactedApiKey;
