//! Operator-facing report on stdout.
//!
//! Human-readable lines with status icons. Not machine-parseable and not
//! versioned; scripts should read the key file instead.

use common::HttpStatusCode;
use key_core::error::{CredentialError, FetchError};
use key_core::{FetchReport, PatchOutcome, PatchStep};

use std::io::{self, Write};

use serde_json::Value;

pub fn generating<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "🔄 Generating ephemeral key...")
}

/// Remediation for a missing or unreadable credential.
pub fn missing_credential<W: Write>(out: &mut W, error: &CredentialError) -> io::Result<()> {
    let variable = error.variable();
    match error {
        CredentialError::Missing { .. } => {
            writeln!(out, "❌ Error: {variable} environment variable is not set")?
        }
        CredentialError::NotUnicode { .. } => {
            writeln!(out, "❌ Error: {variable} environment variable is not valid unicode")?
        }
    }
    writeln!(out, "Please set your API key:")?;
    writeln!(out, "  Windows: set {variable}=your_api_key")?;
    writeln!(out, "  Linux/Mac: export {variable}=your_api_key")
}

pub fn success<W: Write>(out: &mut W, report: &FetchReport) -> io::Result<()> {
    status_line(out, report.status)?;
    writeln!(out, "\n✅ Success! Ephemeral Key Generated:")?;
    let pretty = report.response.to_pretty_json().map_err(io::Error::other)?;
    writeln!(out, "{pretty}")?;

    if let Some(key) = report.ephemeral_key() {
        writeln!(out, "\n🔑 Ephemeral Key: {key}")?;
        writeln!(
            out,
            "⏱️  Expires at: {}",
            display_expiry(report.response.expires_at())
        )?;
    }

    match &report.key_file {
        Ok(path) => writeln!(out, "\n💾 Key saved to {}", path.display())?,
        Err(error) => {
            writeln!(out, "\n⚠️ Could not save key file: {}", error.detail())?;
            if let Some(key) = report.ephemeral_key() {
                writeln!(out, "📝 Please copy this key manually: {key}")?;
            }
        }
    }

    patch_step(out, &report.patch, report.ephemeral_key())
}

/// Status line first whenever a response arrived, then one message per kind.
pub fn failure<W: Write>(out: &mut W, error: &FetchError) -> io::Result<()> {
    if let Some(status) = error.status_code() {
        status_line(out, status)?;
    }

    match error {
        FetchError::Rejected { status, body, .. } => {
            writeln!(out, "\n❌ Error: {status}")?;
            writeln!(out, "{body}")
        }
        FetchError::Connection { .. } => {
            writeln!(out, "❌ Connection Error: Please check your internet connection")
        }
        FetchError::Timeout { .. } => writeln!(out, "❌ Timeout Error: Request took too long"),
        FetchError::Unknown { message, .. } => writeln!(out, "❌ Error: {message}"),
    }
}

fn status_line<W: Write>(out: &mut W, status: HttpStatusCode) -> io::Result<()> {
    let icon = if status.is_ok() { "✅" } else { "❌" };
    writeln!(out, "\n{icon} Status Code: {status}")
}

fn patch_step<W: Write>(out: &mut W, step: &PatchStep, key: Option<&str>) -> io::Result<()> {
    match step {
        PatchStep::Disabled => Ok(()),
        PatchStep::MissingKey { target } => writeln!(
            out,
            "⚠️ Response carried no ephemeral key, {} was not updated",
            target.path.display()
        ),
        PatchStep::Applied { target, outcome } => match outcome {
            PatchOutcome::Updated => writeln!(
                out,
                "✅ Auto-updated {} with new ephemeral key",
                target.path.display()
            ),
            PatchOutcome::AlreadyCurrent => writeln!(
                out,
                "✅ {} already holds this ephemeral key",
                target.path.display()
            ),
            PatchOutcome::PatternNotFound => writeln!(
                out,
                "⚠️ Could not find API key pattern in {}",
                target.path.display()
            ),
        },
        PatchStep::Failed { target, error } => {
            writeln!(
                out,
                "⚠️ Could not auto-update {}: {}",
                target.path.display(),
                error.detail()
            )?;
            writeln!(
                out,
                "📝 Please manually copy this key to {}: {}",
                target.path.display(),
                key.unwrap_or_default()
            )
        }
    }
}

/// Strings print bare, numbers and other JSON as-is.
pub fn display_expiry(expires_at: Option<&Value>) -> String {
    match expires_at {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "unknown".to_string(),
    }
}
