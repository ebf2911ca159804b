//! HTTP client for `POST /v1/realtime/client_secrets`.

pub mod session;

pub use session::{SessionKind, SessionRequest, SessionResponse, SessionSpec};

use crate::config::FetcherConfig;
use crate::error::RealtimeClientError;

use common::{HttpStatusCode, RedactedApiKey};

use std::time::Duration;

use log::debug;
use reqwest::Client;
use url::Url;

/// Status and raw body of the endpoint's answer.
///
/// The body is kept as text so a non-200 answer can be echoed verbatim.
#[derive(Debug, Clone)]
pub struct ClientSecretResponse {
    pub status: HttpStatusCode,
    pub body: String,
}

#[derive(Clone)]
pub struct RealtimeClient {
    endpoint: Url,
    client: Client,
}

impl RealtimeClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, RealtimeClientError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { endpoint, client })
    }

    pub fn from_config(config: &FetcherConfig) -> Result<Self, RealtimeClientError> {
        Self::new(config.endpoint.clone(), config.timeout)
    }

    /// Issue one POST for an ephemeral key. No retries.
    ///
    /// Any HTTP status is returned as `Ok`; only transport failures are
    /// errors.
    ///
    /// # Errors
    /// Returns [`RealtimeClientError::Connection`] or
    /// [`RealtimeClientError::Timeout`] for those transport failures and
    /// [`RealtimeClientError::Http`] for anything else `reqwest` reports.
    pub async fn request_client_secret(
        &self,
        api_key: &RedactedApiKey,
        request: &SessionRequest,
    ) -> Result<ClientSecretResponse, RealtimeClientError> {
        debug!(
            "POST {} (model={}, key={} chars)",
            self.endpoint,
            request.session.model,
            api_key.len()
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key.expose())
            .json(request)
            .send()
            .await?;

        let status = HttpStatusCode(response.status().as_u16());
        let body = response.text().await?;

        debug!("Endpoint answered HTTP {status} ({} bytes)", body.len());

        Ok(ClientSecretResponse { status, body })
    }
}
