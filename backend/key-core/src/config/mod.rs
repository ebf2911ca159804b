//! Run configuration with environment overrides.
//!
//! Every knob has a built-in default matching the OpenAI realtime
//! client-secrets contract. Overrides are read through a lookup function so
//! tests never have to touch the real process environment.

use crate::error::ConfigError;
use crate::patcher::PatchTarget;
use crate::realtime_client::SessionKind;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use const_format::concatcp;
use log::{debug, info};
use url::Url;

pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com";
pub const CLIENT_SECRETS_PATH: &str = "/v1/realtime/client_secrets";
pub const DEFAULT_ENDPOINT: &str = concatcp!(OPENAI_API_BASE_URL, CLIENT_SECRETS_PATH);
pub const DEFAULT_MODEL: &str = "gpt-realtime";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_KEY_FILE: &str = "ephemeral_key.json";
pub const DEFAULT_PATCH_TARGET: &str = "src/realtime.ts";
pub const DEFAULT_PATCH_IDENTIFIER: &str = "apiKey";

const MAX_TIMEOUT_SECS: u64 = 300;

// ============================================
// OVERRIDE VARIABLES
// ============================================

pub const ENV_API_KEY_ENV: &str = "EPHEMERAL_KEY_API_KEY_ENV";
pub const ENV_ENDPOINT: &str = "EPHEMERAL_KEY_ENDPOINT";
pub const ENV_MODEL: &str = "EPHEMERAL_KEY_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "EPHEMERAL_KEY_TIMEOUT_SECS";
pub const ENV_OUTPUT: &str = "EPHEMERAL_KEY_OUTPUT";
pub const ENV_PATCH_TARGET: &str = "EPHEMERAL_KEY_PATCH_TARGET";
pub const ENV_PATCH_IDENTIFIER: &str = "EPHEMERAL_KEY_PATCH_IDENTIFIER";

/// Everything one fetch run needs besides the secret itself.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Environment variable holding the long-lived key.
    pub api_key_env: String,
    /// Client-secrets endpoint.
    pub endpoint: Url,
    pub session_kind: SessionKind,
    pub model: String,
    /// Upper bound for the whole request.
    pub timeout: Duration,
    /// Where the response body is mirrored.
    pub key_file: PathBuf,
    /// `None` disables the patch step.
    pub patch_target: Option<PatchTarget>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            endpoint: default_endpoint(),
            session_kind: SessionKind::Realtime,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
            patch_target: Some(PatchTarget::new(
                DEFAULT_PATCH_TARGET,
                DEFAULT_PATCH_IDENTIFIER,
            )),
        }
    }
}

fn default_endpoint() -> Url {
    // Compile-time constant, covered by tests
    Url::parse(DEFAULT_ENDPOINT).expect("DEFAULT_ENDPOINT is a valid URL")
}

impl FetcherConfig {
    /// Resolve config from the process environment.
    ///
    /// Call after `.env` loading so file-provided overrides are visible.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve config from an arbitrary variable lookup.
    ///
    /// Unset variables keep the default. An empty
    /// `EPHEMERAL_KEY_PATCH_TARGET` disables patching; empty values for the
    /// other variables are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for a malformed URL or timeout and
    /// [`ConfigError::Validation`] if the resulting config is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(name) = non_empty(ENV_API_KEY_ENV) {
            config.api_key_env = name.trim().to_string();
        }

        if let Some(raw) = non_empty(ENV_ENDPOINT) {
            config.endpoint = Url::parse(raw.trim())
                .map_err(|e| ConfigError::parse(ENV_ENDPOINT, e.to_string()))?;
            info!("Using endpoint override: {}", config.endpoint);
        }

        if let Some(model) = non_empty(ENV_MODEL) {
            config.model = model.trim().to_string();
        }

        if let Some(raw) = non_empty(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::parse(ENV_TIMEOUT_SECS, format!("'{raw}': {e}")))?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(path) = non_empty(ENV_OUTPUT) {
            config.key_file = PathBuf::from(path.trim());
        }

        match lookup(ENV_PATCH_TARGET) {
            Some(path) if path.trim().is_empty() => {
                debug!("{ENV_PATCH_TARGET} is empty, patch step disabled");
                config.patch_target = None;
            }
            Some(path) => {
                let identifier = config
                    .patch_target
                    .as_ref()
                    .map(|target| target.identifier.clone())
                    .unwrap_or_else(|| DEFAULT_PATCH_IDENTIFIER.to_string());
                config.patch_target = Some(PatchTarget::new(path.trim(), identifier));
            }
            None => {}
        }

        if let Some(identifier) = non_empty(ENV_PATCH_IDENTIFIER) {
            if let Some(target) = config.patch_target.as_mut() {
                target.identifier = identifier.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key_env.is_empty() {
            return Err(ConfigError::validation("api key variable name cannot be empty"));
        }

        if !matches!(self.endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::validation(format!(
                "Invalid endpoint scheme: {} (expected http or https)",
                self.endpoint.scheme()
            )));
        }

        if self.model.is_empty() {
            return Err(ConfigError::validation("model cannot be empty"));
        }

        let secs = self.timeout.as_secs();
        if self.timeout.is_zero() || secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::validation(format!(
                "Invalid timeout: {secs}s (must be 1-{MAX_TIMEOUT_SECS})"
            )));
        }

        if self.key_file.as_os_str().is_empty() {
            return Err(ConfigError::validation("key file path cannot be empty"));
        }

        if let Some(target) = &self.patch_target {
            if !is_identifier(&target.identifier) {
                return Err(ConfigError::validation(format!(
                    "Invalid patch identifier: '{}'",
                    target.identifier
                )));
            }
        }

        Ok(())
    }
}

/// Plain JS identifier: letter, `_` or `$` first, then also digits.
fn is_identifier(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
