use crate::helpers::{TEST_API_KEY, api_key, config_for, unused_local_uri, with_patch_target};

use key_core::config::CLIENT_SECRETS_PATH;
use key_core::error::{FetchError, KeyFileError};
use key_core::{CredentialFetcher, PatchOutcome, PatchStep};

use common::HttpStatusCode;

use std::fs;
use std::time::Duration;

use serde_json::{Value, json};
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Public API tests for the fetch pipeline
// The endpoint is a wiremock server, the working directory a tempdir
// ============================================================================

/// **VALUE**: Verifies the request carries the bearer key, JSON content type and exact body.
///
/// **WHY THIS MATTERS**: The endpoint authenticates with the long-lived key and
/// rejects any other payload shape. A mismatch here means every run fails with 4xx.
///
/// **BUG THIS CATCHES**: Would catch dropping `bearer_auth`, sending form data, or
/// renaming the `type` field.
#[tokio::test]
async fn given_api_key_when_fetch_then_sends_expected_request() {
    // GIVEN: A mock that only answers a correctly shaped request
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CLIENT_SECRETS_PATH))
        .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"session": {"type": "realtime", "model": "gpt-realtime"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": "ek_1", "expires_at": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let fetcher = CredentialFetcher::new(config_for(&server.uri(), dir.path())).unwrap();

    // WHEN: Fetching
    let report = fetcher.fetch(&api_key()).await;

    // THEN: The mock matched (anything else would be a 404 from wiremock)
    assert!(report.is_ok(), "request did not match: {report:?}");
}

/// **VALUE**: Verifies a 200 response is mirrored to the key file exactly.
///
/// **WHY THIS MATTERS**: Other tooling reads `ephemeral_key.json`. The file must be
/// the response body, not a re-shaped subset of it.
///
/// **BUG THIS CATCHES**: Would catch writing only `value`, dropping unknown fields,
/// or writing compact JSON.
#[tokio::test]
async fn given_success_response_when_fetch_then_key_file_matches_body() {
    // GIVEN: A 200 answer with key, expiry and extra fields
    let body = json!({
        "value": "abc",
        "expires_at": 123,
        "session": {"type": "realtime", "model": "gpt-realtime"}
    });
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CLIENT_SECRETS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config = config_for(&server.uri(), dir.path());
    let key_file = config.key_file.clone();

    // WHEN: Fetching
    let report = CredentialFetcher::new(config)
        .unwrap()
        .fetch(&api_key())
        .await
        .expect("fetch should succeed");

    // THEN: The report carries the key and the file holds the body verbatim
    assert_eq!(report.status, HttpStatusCode::OK);
    assert_eq!(report.ephemeral_key(), Some("abc"));
    assert_eq!(report.key_file.as_ref().ok(), Some(&key_file));
    assert!(matches!(report.patch, PatchStep::Disabled));

    let written = fs::read_to_string(&key_file).unwrap();
    let parsed: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed, body);
    assert!(written.contains("\n  \"value\": \"abc\""), "not 2-space indented:\n{written}");
}

/// **VALUE**: Verifies an existing key file is overwritten, not appended to.
#[tokio::test]
async fn given_stale_key_file_when_fetch_then_file_overwritten() {
    // GIVEN: A stale key file that is longer than the new body
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": "new"})))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config = config_for(&server.uri(), dir.path());
    fs::write(&config.key_file, "x".repeat(4096)).unwrap();
    let key_file = config.key_file.clone();

    // WHEN: Fetching
    CredentialFetcher::new(config).unwrap().fetch(&api_key()).await.unwrap();

    // THEN: Only the new body remains
    let parsed: Value = serde_json::from_str(&fs::read_to_string(key_file).unwrap()).unwrap();
    assert_eq!(parsed, json!({"value": "new"}));
}

/// **VALUE**: Verifies a non-200 answer is reported with its body and writes nothing.
///
/// **WHY THIS MATTERS**: The key file must never hold an error payload. Downstream
/// readers would treat it as a key.
#[tokio::test]
async fn given_404_response_when_fetch_then_rejected_and_no_file() {
    // GIVEN: A 404 answer
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CLIENT_SECRETS_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"error\":\"not found\"}"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config = config_for(&server.uri(), dir.path());
    let key_file = config.key_file.clone();

    // WHEN: Fetching
    let result = CredentialFetcher::new(config).unwrap().fetch(&api_key()).await;

    // THEN: Rejected with status and raw body, nothing on disk
    match result {
        Err(FetchError::Rejected { status, body, .. }) => {
            assert_eq!(status, HttpStatusCode(404));
            assert_eq!(body, "{\"error\":\"not found\"}");
        }
        other => panic!("Expected Rejected, got {other:?}"),
    }
    assert!(!key_file.exists(), "no key file should be written for a 404");
}

/// **VALUE**: Verifies a refused connection is classified as a connection failure.
///
/// **BUG THIS CATCHES**: Would catch losing `is_connect()` inspection, which turns
/// every network problem into the generic error message.
#[tokio::test]
async fn given_nothing_listening_when_fetch_then_connection_error() {
    // GIVEN: An endpoint on a closed port
    let dir = tempdir().unwrap();
    let config = config_for(&unused_local_uri(), dir.path());
    let key_file = config.key_file.clone();

    // WHEN: Fetching
    let result = CredentialFetcher::new(config).unwrap().fetch(&api_key()).await;

    // THEN: Connection error, no file
    assert!(
        matches!(result, Err(FetchError::Connection { .. })),
        "Expected Connection, got {result:?}"
    );
    assert!(!key_file.exists());
}

/// **VALUE**: Verifies the configured timeout bounds the request.
#[tokio::test]
async fn given_slow_endpoint_when_fetch_then_timeout_error() {
    // GIVEN: An endpoint slower than the timeout
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"value": "late"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let mut config = config_for(&server.uri(), dir.path());
    config.timeout = Duration::from_millis(250);
    let key_file = config.key_file.clone();

    // WHEN: Fetching
    let result = CredentialFetcher::new(config).unwrap().fetch(&api_key()).await;

    // THEN: Timeout error, no file
    assert!(
        matches!(result, Err(FetchError::Timeout { .. })),
        "Expected Timeout, got {result:?}"
    );
    assert!(!key_file.exists());
}

/// **VALUE**: Verifies a 200 with a non-JSON body is a generic failure that writes nothing.
#[tokio::test]
async fn given_non_json_success_body_when_fetch_then_unknown_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config = config_for(&server.uri(), dir.path());
    let key_file = config.key_file.clone();

    let result = CredentialFetcher::new(config).unwrap().fetch(&api_key()).await;

    match result {
        Err(FetchError::Unknown { status, .. }) => assert_eq!(status, Some(HttpStatusCode::OK)),
        other => panic!("Expected Unknown, got {other:?}"),
    }
    assert!(!key_file.exists());
}

/// **VALUE**: Verifies an unwritable key file does not swallow the issued key.
///
/// **WHY THIS MATTERS**: The endpoint has already minted the key by the time the
/// save fails. The operator still needs it in the report to copy it by hand.
///
/// **BUG THIS CATCHES**: Would catch turning a save failure into a fetch error,
/// which drops the parsed response before anything is printed.
#[tokio::test]
async fn given_key_file_in_missing_dir_when_fetch_then_report_keeps_key() {
    // GIVEN: A 200 answer and a key file path whose directory does not exist
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"value": "ek_MINTED", "expires_at": 123})),
        )
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let mut config = config_for(&server.uri(), dir.path());
    config.key_file = dir.path().join("missing_dir").join("ephemeral_key.json");
    let key_file = config.key_file.clone();

    // WHEN: Fetching
    let report = CredentialFetcher::new(config)
        .unwrap()
        .fetch(&api_key())
        .await
        .expect("a save failure must not fail the fetch");

    // THEN: The key is reported and the save failure is carried alongside it
    assert_eq!(report.ephemeral_key(), Some("ek_MINTED"));
    match &report.key_file {
        Err(KeyFileError::Create { path, .. }) => assert_eq!(path, &key_file),
        other => panic!("Expected Create error, got {other:?}"),
    }
    assert!(!key_file.exists());
}

/// **VALUE**: Verifies the end-to-end patch: fetch, save, rewrite the literal.
///
/// **WHY THIS MATTERS**: This is the whole point of the patching variant: after one
/// run the client source holds a working key.
#[tokio::test]
async fn given_patch_target_when_fetch_then_literal_replaced() {
    // GIVEN: A patch target holding an expired key
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": "NEW", "expires_at": 9})))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let target = dir.path().join("realtime.ts");
    fs::write(&target, "// client\nconst apiKey = 'OLD'\nconnect(apiKey);\n").unwrap();
    let config = with_patch_target(config_for(&server.uri(), dir.path()), &target);

    // WHEN: Fetching
    let report = CredentialFetcher::new(config).unwrap().fetch(&api_key()).await.unwrap();

    // THEN: The literal now holds the new key, everything else identical
    assert!(matches!(
        report.patch,
        PatchStep::Applied { outcome: PatchOutcome::Updated, .. }
    ));
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "// client\nconst apiKey = 'NEW'\nconnect(apiKey);\n"
    );
}

/// **VALUE**: Verifies a missing patch target degrades to a warning, not a failure.
///
/// **WHY THIS MATTERS**: The key was obtained and saved. Losing it because an
/// unrelated source file moved would be worse than asking for a manual copy.
#[tokio::test]
async fn given_missing_patch_target_when_fetch_then_run_still_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": "NEW"})))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let missing = dir.path().join("src").join("realtime.ts");
    let config = with_patch_target(config_for(&server.uri(), dir.path()), &missing);
    let key_file = config.key_file.clone();

    let report = CredentialFetcher::new(config).unwrap().fetch(&api_key()).await.unwrap();

    assert!(matches!(report.patch, PatchStep::Failed { .. }), "got {:?}", report.patch);
    assert!(key_file.exists(), "key file must still be written");
}

/// **VALUE**: Verifies the patch step is skipped when the response has no key.
///
/// **BUG THIS CATCHES**: Would catch writing `const apiKey = 'None'`-style garbage
/// into the client source.
#[tokio::test]
async fn given_response_without_value_when_fetch_then_patch_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"expires_at": 1})))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let target = dir.path().join("realtime.ts");
    fs::write(&target, "const apiKey = 'OLD'\n").unwrap();
    let config = with_patch_target(config_for(&server.uri(), dir.path()), &target);

    let report = CredentialFetcher::new(config).unwrap().fetch(&api_key()).await.unwrap();

    assert!(matches!(report.patch, PatchStep::MissingKey { .. }));
    assert_eq!(report.ephemeral_key(), None);
    assert_eq!(fs::read_to_string(&target).unwrap(), "const apiKey = 'OLD'\n");
}
