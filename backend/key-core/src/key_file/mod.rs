//! Persisting the response body to the local key file.

use crate::error::KeyFileError;
use crate::realtime_client::SessionResponse;

use common::ErrorLocation;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

/// Write `response` to `path` as 2-space-indented JSON.
///
/// Whole-file overwrite, not atomic. The handle is flushed before it goes
/// out of scope so write errors are reported instead of lost in `Drop`.
///
/// # Errors
///
/// Returns [`KeyFileError`] if the file cannot be created, serialized into
/// or flushed.
pub fn save(path: &Path, response: &SessionResponse) -> Result<(), KeyFileError> {
    let file = File::create(path).map_err(|e| KeyFileError::Create {
        location: ErrorLocation::here(),
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, response.fields()).map_err(|e| {
        KeyFileError::Serialize {
            location: ErrorLocation::here(),
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    writer.flush().map_err(|e| KeyFileError::Write {
        location: ErrorLocation::here(),
        path: path.to_path_buf(),
        source: e,
    })?;

    info!("Key file written to {}", path.display());
    Ok(())
}
