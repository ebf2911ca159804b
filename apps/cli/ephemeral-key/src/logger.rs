//! Diagnostic logging for the ephemeral key tool.
//!
//! Log lines go to stderr (coloured) and optionally to a file, never to
//! stdout: stdout carries the operator-facing report.

use crate::error::AppError;

use common::ErrorLocation;

use std::env;
use std::io::stderr;
use std::panic::Location;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, info, warn};

/// Tracks if logger installation was already attempted.
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

const LOG_FILE_NAME: &str = "ephemeral-key.log";

pub const ENV_LOG_LEVEL: &str = "EPHEMERAL_KEY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "EPHEMERAL_KEY_LOG_DIR";

const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";
const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

#[cfg(debug_assertions)]
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

#[derive(Debug, Clone)]
pub struct LoggerSettings {
    pub level: LevelFilter,
    /// Directory for the optional log file.
    pub log_dir: Option<PathBuf>,
    /// Unparseable level value, reported once the logger is up.
    pub rejected_level: Option<String>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            log_dir: None,
            rejected_level: None,
        }
    }
}

impl LoggerSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            match LevelFilter::from_str(raw.trim()) {
                Ok(level) => settings.level = level,
                Err(_) => settings.rejected_level = Some(raw),
            }
        }

        settings.log_dir = lookup(ENV_LOG_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(|v| PathBuf::from(v.trim()));

        settings
    }
}

/// Install the global logger.
///
/// Safe to call more than once: later calls log a warning and return Ok.
/// The dispatch (including the log file) is built before the once-guard, so
/// a bad log directory is always reported.
///
/// # Errors
///
/// Returns an error if:
/// - The log file cannot be created
/// - Another logger is already installed
pub fn initialize(settings: &LoggerSettings) -> Result<(), AppError> {
    let dispatch = build_dispatch(settings)?;

    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    dispatch.apply().map_err(|e| AppError::Logger {
        message: format!("Failed to initialize logger: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    info!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{:?}", settings.level);
    if let Some(raw) = &settings.rejected_level {
        warn!("Ignoring invalid {ENV_LOG_LEVEL} value '{raw}'");
    }

    Ok(())
}

fn build_dispatch(settings: &LoggerSettings) -> Result<Dispatch, AppError> {
    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let stderr_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0),
            ))
        })
        .chain(stderr());

    let mut base_dispatch = Dispatch::new()
        .level(settings.level)
        // reqwest/hyper internals are noise at debug level
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Info)
        .chain(stderr_dispatch);

    if let Some(log_dir) = &settings.log_dir {
        let log_file_path = log_dir.join(LOG_FILE_NAME);
        let log_file = fern::log_file(&log_file_path).map_err(|e| AppError::Logger {
            message: format!("Failed to create log file {}: {e}", log_file_path.display()),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let file_dispatch = Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "[{date} - {level}] {message} [{file}:{line}]",
                    date = format_rfc3339(SystemTime::now()),
                    level = record.level(),
                    message = message,
                    file = record.file().unwrap_or("unknown"),
                    line = record.line().unwrap_or(0)
                ))
            })
            .chain(log_file);

        base_dispatch = base_dispatch.chain(file_dispatch);
    }

    Ok(base_dispatch)
}
