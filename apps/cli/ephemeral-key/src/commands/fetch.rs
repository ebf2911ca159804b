use crate::console;
use crate::error::AppError;

use common::RedactedApiKey;
use key_core::error::{CredentialError, FetchError};
use key_core::{CredentialFetcher, FetcherConfig};

use std::io::Write;
use std::process::ExitCode;

use log::{debug, error, info, warn};

/// How a run ended, as far as the exit status is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The request was attempted. HTTP and transport failures end here too.
    Completed,
    /// No credential; nothing was attempted.
    MissingCredential,
}

impl RunStatus {
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::MissingCredential => 1,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

/// Fetch one ephemeral key and report the outcome to `out`.
///
/// `CheckCredential → {Abort | SendRequest} → {Success(+Patch) | HttpError
/// | TransportError}`. Only the abort path yields a non-zero status.
///
/// # Errors
///
/// Returns [`AppError::Console`] if writing to `out` fails.
pub async fn run<W: Write>(
    config: FetcherConfig,
    credential: Result<RedactedApiKey, CredentialError>,
    out: &mut W,
) -> Result<RunStatus, AppError> {
    let api_key = match credential {
        Ok(key) => key,
        Err(e) => {
            error!("{e}");
            console::missing_credential(out, &e)?;
            return Ok(RunStatus::MissingCredential);
        }
    };

    console::generating(out)?;

    let fetcher = match CredentialFetcher::new(config) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Failed to build HTTP client: {e}");
            console::failure(out, &FetchError::from(e))?;
            return Ok(RunStatus::Completed);
        }
    };

    debug!("Requesting ephemeral key from {}", fetcher.config().endpoint);

    match fetcher.fetch(&api_key).await {
        Ok(report) => {
            match &report.key_file {
                Ok(path) => info!("Ephemeral key saved to {}", path.display()),
                Err(e) => warn!("Ephemeral key issued but not saved: {e}"),
            }
            console::success(out, &report)?;
        }
        Err(e) => {
            warn!("Fetch ended without a key ({}): {e}", e.category());
            console::failure(out, &e)?;
        }
    }

    out.flush()?;
    Ok(RunStatus::Completed)
}
