//! Rewriting the hard-coded key literal in a source file.
//!
//! The target holds an assignment like `const apiKey = 'ek_...'`. The first
//! such literal is replaced with the freshly issued key; nothing else in the
//! file changes.

use crate::error::PatchError;

use common::ErrorLocation;

use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use regex::{NoExpand, Regex};

/// File and identifier whose literal gets replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchTarget {
    pub path: PathBuf,
    pub identifier: String,
}

impl PatchTarget {
    pub fn new(path: impl Into<PathBuf>, identifier: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            identifier: identifier.into(),
        }
    }
}

/// What happened to the patch target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Literal replaced and the file rewritten.
    Updated,
    /// Literal already held the new key, file left alone.
    AlreadyCurrent,
    /// No matching literal, file left alone.
    PatternNotFound,
}

/// Patch `target` on disk with `new_key`.
///
/// # Errors
///
/// Returns [`PatchError`] if the key cannot be embedded in a single-quoted
/// literal, the pattern cannot be built, or the file cannot be read or
/// written. The file is untouched in every error case except a failed write.
pub fn patch_file(target: &PatchTarget, new_key: &str) -> Result<PatchOutcome, PatchError> {
    let content = fs::read_to_string(&target.path).map_err(|e| PatchError::Read {
        location: ErrorLocation::from(Location::caller()),
        path: target.path.clone(),
        source: e,
    })?;

    let (outcome, updated) = replace_key_literal(&content, &target.identifier, new_key)?;

    if outcome == PatchOutcome::Updated {
        write_back(&target.path, &updated)?;
        info!("Patched key literal '{}' in {}", target.identifier, target.path.display());
    } else if outcome == PatchOutcome::PatternNotFound {
        warn!(
            "No '{}' literal found in {}",
            target.identifier,
            target.path.display()
        );
    } else {
        debug!("{} already holds the current key", target.path.display());
    }

    Ok(outcome)
}

/// Replace the first `const <identifier> = '<...>'` in `content`.
///
/// Returns the outcome and the resulting text (a copy of `content` unless
/// the outcome is [`PatchOutcome::Updated`]). `$` and other replacement
/// metacharacters in `new_key` are inserted literally.
///
/// # Errors
///
/// Returns [`PatchError::UnsafeKey`] for keys containing `'`, `\` or a line
/// break, and [`PatchError::Pattern`] if the identifier yields no valid
/// regex.
pub fn replace_key_literal(
    content: &str,
    identifier: &str,
    new_key: &str,
) -> Result<(PatchOutcome, String), PatchError> {
    ensure_literal_safe(new_key)?;

    let pattern = literal_pattern(identifier)?;
    let replacement = format!("const {identifier} = '{new_key}'");

    let Some(found) = pattern.find(content) else {
        return Ok((PatchOutcome::PatternNotFound, content.to_string()));
    };

    if found.as_str() == replacement {
        return Ok((PatchOutcome::AlreadyCurrent, content.to_string()));
    }

    let updated = pattern.replacen(content, 1, NoExpand(&replacement));
    Ok((PatchOutcome::Updated, updated.into_owned()))
}

fn literal_pattern(identifier: &str) -> Result<Regex, PatchError> {
    let source = format!(r"const {} = '[^']+'", regex::escape(identifier));
    Regex::new(&source).map_err(|e| PatchError::Pattern {
        location: ErrorLocation::from(Location::caller()),
        reason: e.to_string(),
    })
}

#[track_caller]
fn ensure_literal_safe(key: &str) -> Result<(), PatchError> {
    match key.chars().find(|c| matches!(c, '\'' | '\\' | '\n' | '\r')) {
        Some(character) => Err(PatchError::UnsafeKey {
            location: ErrorLocation::from(Location::caller()),
            character,
        }),
        None => Ok(()),
    }
}

fn write_back(path: &Path, content: &str) -> Result<(), PatchError> {
    fs::write(path, content).map_err(|e| PatchError::Write {
        location: ErrorLocation::from(Location::caller()),
        path: path.to_path_buf(),
        source: e,
    })
}
