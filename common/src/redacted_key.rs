//! Secret wrapper for the long-lived API key.
//!
//! The standard key read from the environment is only ever needed for one
//! `Authorization` header. Everywhere else it travels inside
//! [`RedactedApiKey`], which cannot be printed or serialized by accident.

use crate::RedactError;

use std::fmt;

use serde::ser::Error;
use zeroize::Zeroize;

/// An API key that never exposes its value in logs, console output or JSON.
#[derive(Clone)]
pub struct RedactedApiKey {
    inner: String,
}

impl RedactedApiKey {
    /// Wrap a raw key. Surrounding whitespace (a stray newline from a `.env`
    /// file, for instance) is stripped.
    pub fn new(key: String) -> Self {
        let mut key = key;
        let trimmed = key.trim();
        if trimmed.len() != key.len() {
            let owned = trimmed.to_owned();
            key.zeroize();
            key = owned;
        }
        Self { inner: key }
    }

    /// Raw key value for the `Authorization` header.
    ///
    /// # Security Note
    /// Only call this when building the outbound request.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Key length (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for RedactedApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedApiKey([REDACTED; {} chars])", self.inner.len())
    }
}

impl fmt::Display for RedactedApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED API KEY]")
    }
}

impl Drop for RedactedApiKey {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl serde::Serialize for RedactedApiKey {
    #[track_caller]
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::serialization("RedactedApiKey")))
    }
}
