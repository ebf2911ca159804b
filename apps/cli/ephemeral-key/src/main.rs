use ephemeral_key::commands::fetch;
use ephemeral_key::logger::{LoggerSettings, initialize as LoggerInitialize};

use key_core::FetcherConfig;
use key_core::credential::{load_api_key, try_load_dotenv};

use std::io::stdout;
use std::process::ExitCode;

use log::{debug, error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // .env first so it can carry log and config overrides
    let env_result = try_load_dotenv();

    if let Err(e) = LoggerInitialize(&LoggerSettings::from_env()) {
        eprintln!("⚠️ {e}");
    }

    match &env_result.path {
        Some(path) => info!("Loaded .env from: {}", path.display()),
        None => debug!("No .env file found - relying on the process environment"),
    }
    if let Some((path, reason)) = &env_result.rejected {
        warn!("Failed to parse .env at {}: {reason}", path.display());
    }

    let config = match FetcherConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            eprintln!("❌ Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let credential = load_api_key(&config.api_key_env);

    match fetch::run(config, credential, &mut stdout()).await {
        Ok(status) => status.exit_code(),
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
