// Unit tests for credential loading
// Uses api_key_from_var() so no environment mutation is needed

use crate::credential::{api_key_from_var, load_env_file};
use crate::error::CredentialError;

use std::env::VarError;
use std::ffi::OsString;
use std::fs;

use tempfile::tempdir;

/// **VALUE**: Verifies an unset variable yields `Missing`.
///
/// **WHY THIS MATTERS**: This is the one fatal path: the binary must print
/// remediation and exit 1 without touching the network.
#[test]
fn given_unset_variable_when_loaded_then_returns_missing() {
    let result = api_key_from_var("OPENAI_API_KEY", Err(VarError::NotPresent));

    match result {
        Err(CredentialError::Missing { variable, .. }) => assert_eq!(variable, "OPENAI_API_KEY"),
        other => panic!("Expected Missing, got {other:?}"),
    }
}

/// **VALUE**: Verifies empty and whitespace-only values count as missing.
///
/// **BUG THIS CATCHES**: `export OPENAI_API_KEY=` would otherwise send
/// `Authorization: Bearer ` and get a confusing 401.
#[test]
fn given_blank_value_when_loaded_then_returns_missing() {
    for value in ["", "   ", "\n"] {
        let result = api_key_from_var("OPENAI_API_KEY", Ok(value.to_string()));

        assert!(
            matches!(result, Err(CredentialError::Missing { .. })),
            "{value:?} should be treated as missing"
        );
    }
}

/// **VALUE**: Verifies a set value is wrapped and trimmed.
#[test]
fn given_value_when_loaded_then_returns_redacted_key() {
    let key = api_key_from_var("OPENAI_API_KEY", Ok("sk-test-123\n".to_string()))
        .expect("key should load");

    assert_eq!(key.expose(), "sk-test-123");
}

/// **VALUE**: Verifies non-UTF-8 values get their own error variant.
#[test]
fn given_non_unicode_value_when_loaded_then_returns_not_unicode() {
    let result = api_key_from_var(
        "OPENAI_API_KEY",
        Err(VarError::NotUnicode(OsString::from("invalid"))),
    );

    let err = result.expect_err("non-unicode should fail");
    assert!(matches!(err, CredentialError::NotUnicode { .. }));
    assert_eq!(err.variable(), "OPENAI_API_KEY");
}

/// **VALUE**: Verifies an absent `.env` is neither loaded nor reported as broken.
#[test]
fn given_no_env_file_when_loaded_then_nothing_reported() {
    let dir = tempdir().unwrap();

    let result = load_env_file(&dir.path().join(".env"));

    assert!(result.path.is_none());
    assert!(result.rejected.is_none());
}

/// **VALUE**: Verifies a malformed `.env` comes back to the caller instead of being logged.
///
/// **WHY THIS MATTERS**: `.env` is loaded before the logger is installed. A warning
/// logged at that point is dropped, so the caller must get the reason to log later.
///
/// **BUG THIS CATCHES**: Would catch the parse failure being swallowed silently.
#[test]
fn given_malformed_env_file_when_loaded_then_rejection_returned() {
    // GIVEN: A `.env` whose only line has no `=`
    let dir = tempdir().unwrap();
    let env_path = dir.path().join(".env");
    fs::write(&env_path, "EPHEMERAL_KEY_TEST_BROKEN value\n").unwrap();

    // WHEN: Loading it
    let result = load_env_file(&env_path);

    // THEN: Nothing loaded, the path and reason are handed back
    assert!(result.path.is_none());
    let (path, reason) = result.rejected.expect("malformed file should be reported");
    assert_eq!(path, env_path);
    assert!(!reason.is_empty());
}
