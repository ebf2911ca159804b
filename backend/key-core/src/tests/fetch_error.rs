// Unit tests for fetch error classification

use crate::error::{FetchError, KeyFileError, RealtimeClientError};

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::path::PathBuf;

/// **VALUE**: Verifies transport errors keep their connection/timeout identity.
///
/// **WHY THIS MATTERS**: The console prints a different message for each. Collapsing
/// them into `Unknown` would tell the operator nothing about their network.
#[test]
fn given_client_errors_when_converted_then_category_is_preserved() {
    let location = ErrorLocation::from(Location::caller());

    let connection = FetchError::from(RealtimeClientError::Connection {
        message: "refused".to_string(),
        location,
    });
    let timeout = FetchError::from(RealtimeClientError::Timeout {
        message: "slow".to_string(),
        location,
    });
    let other = FetchError::from(RealtimeClientError::Http {
        message: "body decode".to_string(),
        location,
    });

    assert_eq!(connection.category(), "connection");
    assert_eq!(timeout.category(), "timeout");
    assert_eq!(other.category(), "unknown");
    assert_eq!(other.status_code(), None);
}

/// **VALUE**: Verifies rejected responses are split by status range.
#[test]
fn given_rejected_status_when_categorized_then_uses_status_range() {
    assert_eq!(FetchError::rejected(HttpStatusCode(401), "").category(), "client_error");
    assert_eq!(FetchError::rejected(HttpStatusCode(502), "").category(), "server_error");
    assert_eq!(FetchError::rejected(HttpStatusCode(302), "").category(), "http_error");
    assert_eq!(
        FetchError::rejected(HttpStatusCode(404), "nope").status_code(),
        Some(HttpStatusCode(404))
    );
}

/// **VALUE**: Verifies operator-facing details carry no source location.
///
/// **WHY THIS MATTERS**: Details are printed on stdout next to the key. The located
/// `Display` text belongs in the log, not in the operator's report.
///
/// **BUG THIS CATCHES**: Would catch `detail()` falling back to `to_string()`, which
/// appends `[file:line:col]`.
#[test]
fn given_located_errors_when_detailed_then_no_source_path() {
    // GIVEN: A key file error and an unclassified client error
    let location = ErrorLocation::from(Location::caller());
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let key_file = KeyFileError::Create {
        location,
        path: PathBuf::from("ephemeral_key.json"),
        source: io,
    };
    let client = RealtimeClientError::Http {
        message: "body decode".to_string(),
        location,
    };

    // WHEN: Rendering details
    let key_file_detail = key_file.detail();
    let converted = FetchError::from(client);

    // THEN: Only the cause is kept; Display still carries the location
    assert_eq!(key_file_detail, "ephemeral_key.json: read-only");
    assert!(key_file.to_string().contains(".rs:"));
    match converted {
        FetchError::Unknown { message, .. } => assert_eq!(message, "body decode"),
        other => panic!("Expected Unknown, got {other:?}"),
    }
}
