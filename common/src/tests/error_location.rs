// Unit tests for location capture

use crate::{ErrorLocation, RedactError};

/// **VALUE**: Verifies `here()` reports this file, not error_location.rs.
///
/// **BUG THIS CATCHES**: Would catch dropping `#[track_caller]` from `here()`, which
/// would make every error point at the same line inside the common crate.
#[test]
fn given_here_when_called_then_points_at_caller() {
    let location = ErrorLocation::here();

    assert!(location.file.ends_with("error_location.rs"));
    assert!(location.file.contains("tests"), "wrong file: {}", location.file);
    assert!(location.line > 0);
    assert!(location.to_string().starts_with('['));
}

/// **VALUE**: Verifies redaction errors name the type and carry a location.
#[test]
fn given_redact_error_when_formatted_then_names_type() {
    let err = RedactError::serialization("RedactedApiKey");

    let message = err.to_string();

    assert!(message.contains("RedactedApiKey refuses to serialize"));
    assert!(message.contains("tests"), "location missing: {message}");
}
