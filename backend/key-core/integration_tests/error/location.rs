use key_core::error::{CredentialError, FetchError, PatchError};

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

/// **VALUE**: Verifies credential errors render the variable name and a location.
///
/// **WHY THIS MATTERS**: This text ends up in the log when the run aborts. Without
/// the variable name the operator cannot tell which key was expected.
///
/// **BUG THIS CATCHES**: Would catch removing `#[track_caller]` from the constructors
/// or the location from the `#[error]` format.
#[test]
fn given_missing_credential_when_formatted_then_includes_variable_and_location() {
    // GIVEN: A missing credential error built here
    let err = CredentialError::missing("OPENAI_API_KEY");

    // WHEN: Formatting
    let message = err.to_string();

    // THEN: Variable and this file are named
    assert!(message.contains("OPENAI_API_KEY"));
    assert!(message.contains("location.rs"), "location missing: {message}");
}

/// **VALUE**: Verifies `FetchError` constructors capture the caller's location.
#[test]
fn given_rejected_error_when_formatted_then_includes_status_and_location() {
    let err = FetchError::rejected(HttpStatusCode(401), "invalid key");

    let message = err.to_string();

    assert!(message.contains("HTTP 401"));
    assert!(message.contains("invalid key"));
    assert!(message.contains("location.rs"), "location missing: {message}");
}

/// **VALUE**: Verifies the unsafe-key message names the offending character.
#[test]
#[track_caller]
fn given_unsafe_key_error_when_formatted_then_names_character() {
    let err = PatchError::UnsafeKey {
        location: ErrorLocation::from(Location::caller()),
        character: '\'',
    };

    let message = err.to_string();

    assert!(message.contains("Patch Unsafe Key Error"));
    assert!(message.contains("'\\''"), "character missing: {message}");
}
