//! Loading the long-lived API key from `.env` and the process environment.
//!
//! # Security
//! - The key is wrapped in [`RedactedApiKey`] as soon as it is read
//! - Only its length is ever logged

use crate::error::CredentialError;

use common::RedactedApiKey;

use std::env::{self, VarError};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

/// Result of attempting to load a `.env` file.
///
/// Loading runs before the logger exists, so nothing is logged here; the
/// caller reports this once logging is up.
#[derive(Debug, Default)]
pub struct EnvLoadResult {
    /// Path to the loaded `.env` file, if found.
    pub path: Option<PathBuf>,
    /// A `.env` file that exists but could not be parsed, with the reason.
    pub rejected: Option<(PathBuf, String)>,
}

/// Loads `.env` from the current directory (or an ancestor), falling back
/// to the executable's directory. Never overrides variables that are
/// already set. A missing file is not an error.
pub fn try_load_dotenv() -> EnvLoadResult {
    if let Ok(path) = dotenvy::dotenv() {
        return EnvLoadResult {
            path: Some(path),
            rejected: None,
        };
    }

    match env::current_exe() {
        Ok(exe_path) => match exe_path.parent() {
            Some(exe_dir) => load_env_file(&exe_dir.join(".env")),
            None => EnvLoadResult::default(),
        },
        Err(_) => EnvLoadResult::default(),
    }
}

/// Load one specific `.env` file if it exists.
pub fn load_env_file(env_path: &Path) -> EnvLoadResult {
    if !env_path.exists() {
        return EnvLoadResult::default();
    }

    match dotenvy::from_path(env_path) {
        Ok(()) => EnvLoadResult {
            path: Some(env_path.to_path_buf()),
            rejected: None,
        },
        Err(e) => EnvLoadResult {
            path: None,
            rejected: Some((env_path.to_path_buf(), e.to_string())),
        },
    }
}

/// Read the API key from `variable` in the process environment.
///
/// # Errors
///
/// Returns [`CredentialError::Missing`] if the variable is unset, empty or
/// whitespace only, and [`CredentialError::NotUnicode`] if it is not valid
/// UTF-8.
#[track_caller]
pub fn load_api_key(variable: &str) -> Result<RedactedApiKey, CredentialError> {
    api_key_from_var(variable, env::var(variable))
}

/// Turn the raw result of an environment lookup into a key.
#[track_caller]
pub fn api_key_from_var(
    variable: &str,
    value: Result<String, VarError>,
) -> Result<RedactedApiKey, CredentialError> {
    match value {
        Ok(raw) => {
            let key = RedactedApiKey::new(raw);
            if key.is_empty() {
                warn!("{variable} is set but empty");
                return Err(CredentialError::missing(variable));
            }
            info!("Found API key in {variable} ({} chars)", key.len());
            Ok(key)
        }
        Err(VarError::NotPresent) => {
            debug!("{variable} is not set");
            Err(CredentialError::missing(variable))
        }
        Err(VarError::NotUnicode(_)) => {
            warn!("{variable} contains invalid unicode");
            Err(CredentialError::not_unicode(variable))
        }
    }
}
