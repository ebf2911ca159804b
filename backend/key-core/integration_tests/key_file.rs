use key_core::SessionResponse;
use key_core::error::KeyFileError;
use key_core::key_file::save;

use std::fs;

use serde_json::json;
use tempfile::tempdir;

/// **VALUE**: Verifies an unwritable location yields a create error, not a panic.
///
/// **WHY THIS MATTERS**: The fetch pipeline reports this next to the issued key.
/// A panic here would lose the freshly issued key without any explanation.
#[test]
fn given_missing_directory_when_saved_then_returns_create_error() {
    // GIVEN: A path inside a directory that does not exist
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("ephemeral_key.json");
    let response = SessionResponse::from_body(r#"{"value":"k"}"#).unwrap();

    // WHEN: Saving
    let result = save(&path, &response);

    // THEN: Create error naming the path
    match result {
        Err(KeyFileError::Create { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected Create error, got {other:?}"),
    }
}

/// **VALUE**: Verifies the saved file is exactly the pretty-printed response.
#[test]
fn given_response_when_saved_then_file_is_pretty_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ephemeral_key.json");
    let response = SessionResponse::from_body(r#"{"value":"k","expires_at":5}"#).unwrap();

    save(&path, &response).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, "{\n  \"value\": \"k\",\n  \"expires_at\": 5\n}");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&written).unwrap(),
        json!({"value": "k", "expires_at": 5})
    );
}
