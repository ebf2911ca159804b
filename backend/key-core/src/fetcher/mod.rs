//! The linear fetch pipeline.
//!
//! `SendRequest → {Rejected | TransportError | Parse → SaveKeyFile → Patch}`.
//! One attempt, no retries. The caller owns the credential check and all
//! console output; this module only decides what happened.
//!
//! Once a 200 body has parsed, the key has been issued and the run reports
//! it. Save and patch failures are carried inside [`FetchReport`].

use crate::config::FetcherConfig;
use crate::error::{FetchError, KeyFileError, PatchError, RealtimeClientError};
use crate::key_file;
use crate::patcher::{self, PatchOutcome, PatchTarget};
use crate::realtime_client::{RealtimeClient, SessionRequest, SessionResponse};

use common::{HttpStatusCode, RedactedApiKey};

use std::path::PathBuf;

use log::{debug, info, warn};

/// Result of the optional patch step. Never fails the run.
#[derive(Debug)]
pub enum PatchStep {
    /// No patch target configured.
    Disabled,
    /// The response had no usable `value` to write.
    MissingKey { target: PatchTarget },
    Applied {
        target: PatchTarget,
        outcome: PatchOutcome,
    },
    Failed {
        target: PatchTarget,
        error: PatchError,
    },
}

/// Everything a successful run produced.
#[derive(Debug)]
pub struct FetchReport {
    pub status: HttpStatusCode,
    pub response: SessionResponse,
    /// Where the response body was written, or why it could not be.
    pub key_file: Result<PathBuf, KeyFileError>,
    pub patch: PatchStep,
}

impl FetchReport {
    /// The new ephemeral key, if the response carried a non-empty one.
    pub fn ephemeral_key(&self) -> Option<&str> {
        usable_key(&self.response)
    }
}

pub struct CredentialFetcher {
    config: FetcherConfig,
    client: RealtimeClient,
    request: SessionRequest,
}

impl CredentialFetcher {
    /// Build the client and the fixed request payload.
    ///
    /// # Errors
    /// Returns [`RealtimeClientError`] if the HTTP client cannot be built.
    pub fn new(config: FetcherConfig) -> Result<Self, RealtimeClientError> {
        let client = RealtimeClient::from_config(&config)?;
        let request = SessionRequest::new(config.session_kind, config.model.clone());

        Ok(Self {
            config,
            client,
            request,
        })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Request one ephemeral key, persist it, then patch the target.
    ///
    /// Nothing is written unless the endpoint answered 200 with a JSON
    /// object body. An unwritable key file does not fail the fetch; it is
    /// reported through [`FetchReport::key_file`].
    ///
    /// # Errors
    /// Returns [`FetchError::Rejected`] for a non-200 answer,
    /// [`FetchError::Connection`] / [`FetchError::Timeout`] for those
    /// transport failures, and [`FetchError::Unknown`] for everything else
    /// (including an unparseable body).
    pub async fn fetch(&self, api_key: &RedactedApiKey) -> Result<FetchReport, FetchError> {
        let answer = self
            .client
            .request_client_secret(api_key, &self.request)
            .await
            .map_err(|e| {
                warn!("Client-secrets request failed: {e}");
                FetchError::from(e)
            })?;

        let status = answer.status;
        if !status.is_ok() {
            let error = FetchError::rejected(status, answer.body);
            warn!("Endpoint rejected the request ({})", error.category());
            return Err(error);
        }

        let response = SessionResponse::from_body(&answer.body).map_err(|e| {
            FetchError::unknown(format!("Invalid response body: {e}"), Some(status))
        })?;

        let key_file = match key_file::save(&self.config.key_file, &response) {
            Ok(()) => Ok(self.config.key_file.clone()),
            Err(e) => {
                warn!("Key file not saved: {e}");
                Err(e)
            }
        };

        let patch = self.patch(&response);

        Ok(FetchReport {
            status,
            response,
            key_file,
            patch,
        })
    }

    fn patch(&self, response: &SessionResponse) -> PatchStep {
        let Some(target) = self.config.patch_target.clone() else {
            debug!("Patch step disabled");
            return PatchStep::Disabled;
        };

        let Some(key) = usable_key(response) else {
            warn!("Response carried no key value, skipping patch of {}", target.path.display());
            return PatchStep::MissingKey { target };
        };

        match patcher::patch_file(&target, key) {
            Ok(outcome) => {
                info!("Patch step finished: {outcome:?}");
                PatchStep::Applied { target, outcome }
            }
            Err(error) => {
                warn!("Patch step failed: {error}");
                PatchStep::Failed { target, error }
            }
        }
    }
}

fn usable_key(response: &SessionResponse) -> Option<&str> {
    response.value().filter(|key| !key.is_empty())
}
