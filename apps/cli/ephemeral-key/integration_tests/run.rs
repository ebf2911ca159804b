use ephemeral_key::commands::fetch::{RunStatus, run};

use common::RedactedApiKey;
use key_core::config::CLIENT_SECRETS_PATH;
use key_core::error::CredentialError;
use key_core::{FetcherConfig, PatchTarget};

use std::fs;
use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use serde_json::{Value, json};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Tests for the run() command: credential check, fetch, console report
// ============================================================================

fn config(base_uri: &str, dir: &Path) -> FetcherConfig {
    FetcherConfig {
        endpoint: format!("{base_uri}{CLIENT_SECRETS_PATH}").parse().unwrap(),
        timeout: Duration::from_secs(5),
        key_file: dir.join("ephemeral_key.json"),
        patch_target: Some(PatchTarget::new(dir.join("src").join("realtime.ts"), "apiKey")),
        ..FetcherConfig::default()
    }
}

fn key() -> Result<RedactedApiKey, CredentialError> {
    Ok(RedactedApiKey::new("sk-test".to_string()))
}

/// **VALUE**: Verifies a missing credential aborts before any request and reports exit 1.
///
/// **WHY THIS MATTERS**: Without a key the request can only fail. Sending it anyway
/// would turn a clear local error into a confusing 401.
///
/// **BUG THIS CATCHES**: Would catch the credential check moving after the HTTP call.
#[tokio::test]
async fn given_missing_credential_when_run_then_aborts_without_request() {
    // GIVEN: A mock that must never be hit
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config = config(&server.uri(), dir.path());
    let key_file = config.key_file.clone();
    let mut out = Vec::new();

    // WHEN: Running without a credential
    let status = run(config, Err(CredentialError::missing("OPENAI_API_KEY")), &mut out)
        .await
        .unwrap();

    // THEN: Exit 1, remediation printed, nothing written
    assert_eq!(status, RunStatus::MissingCredential);
    assert_eq!(status.code(), 1);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("export OPENAI_API_KEY=your_api_key"));
    assert!(!text.contains("Generating"));
    assert!(!key_file.exists());
}

/// **VALUE**: Verifies the success path: report printed, file written, literal patched.
#[tokio::test]
async fn given_success_when_run_then_reports_and_patches() {
    // GIVEN: A 200 answer and a patch target with an old key
    let body = json!({"value": "NEW", "expires_at": 123});
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CLIENT_SECRETS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    let target = dir.path().join("src").join("realtime.ts");
    fs::write(&target, "const apiKey = 'OLD'\n").unwrap();
    let config = config(&server.uri(), dir.path());
    let key_file = config.key_file.clone();
    let mut out = Vec::new();

    // WHEN: Running
    let status = run(config, key(), &mut out).await.unwrap();

    // THEN: Exit 0, full report, key persisted and patched
    assert_eq!(status, RunStatus::Completed);
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("🔄 Generating ephemeral key..."));
    assert!(text.contains("🔑 Ephemeral Key: NEW"));
    assert!(text.contains("⏱️  Expires at: 123"));
    assert!(text.contains("Auto-updated"));

    let saved: Value = serde_json::from_str(&fs::read_to_string(key_file).unwrap()).unwrap();
    assert_eq!(saved, body);
    assert_eq!(fs::read_to_string(target).unwrap(), "const apiKey = 'NEW'\n");
}

/// **VALUE**: Verifies an unwritable key file still prints the freshly issued key.
///
/// **WHY THIS MATTERS**: The endpoint has minted the key before the save is attempted.
/// If the report stopped at the save error, the key would be lost for good.
///
/// **BUG THIS CATCHES**: Would catch saving before rendering with the save error
/// replacing the whole success report.
#[tokio::test]
async fn given_key_file_in_missing_dir_when_run_then_key_still_printed() {
    // GIVEN: A 200 answer and a key file under a directory that does not exist
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"value": "ek_MINTED", "expires_at": 123})),
        )
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let mut config = config(&server.uri(), dir.path());
    config.key_file = dir.path().join("missing_dir").join("ephemeral_key.json");
    config.patch_target = None;
    let key_file = config.key_file.clone();
    let mut out = Vec::new();

    // WHEN: Running
    let status = run(config, key(), &mut out).await.unwrap();

    // THEN: Full report with the key, a save warning, no file, exit 0
    assert_eq!(status, RunStatus::Completed);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("✅ Success! Ephemeral Key Generated:"), "unexpected output:\n{text}");
    assert!(text.contains("🔑 Ephemeral Key: ek_MINTED"));
    assert!(text.contains("⚠️ Could not save key file:"));
    assert!(text.contains("📝 Please copy this key manually: ek_MINTED"));
    assert!(!text.contains(".rs:"), "source location leaked:\n{text}");
    assert!(!key_file.exists());
}

/// **VALUE**: Verifies a 404 prints status and body, writes nothing, and still exits 0.
///
/// **WHY THIS MATTERS**: Non-200 answers are diagnostics, not crashes. Scripts wrapping
/// the tool rely on the key file's absence, not the exit code.
#[tokio::test]
async fn given_404_when_run_then_prints_body_and_completes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config = config(&server.uri(), dir.path());
    let key_file = config.key_file.clone();
    let mut out = Vec::new();

    let status = run(config, key(), &mut out).await.unwrap();

    assert_eq!(status.code(), 0);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("❌ Error: 404"));
    assert!(text.contains("model not found"));
    assert!(!key_file.exists());
}

/// **VALUE**: Verifies a connection failure prints the connection message and completes.
#[tokio::test]
async fn given_connection_failure_when_run_then_prints_connection_error() {
    // GIVEN: A closed port
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let dir = tempdir().unwrap();
    let config = config(&format!("http://127.0.0.1:{port}"), dir.path());
    let key_file = config.key_file.clone();
    let mut out = Vec::new();

    // WHEN: Running
    let status = run(config, key(), &mut out).await.unwrap();

    // THEN: Connection message, exit 0, nothing written
    assert_eq!(status, RunStatus::Completed);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("❌ Connection Error"), "unexpected output:\n{text}");
    assert!(!key_file.exists());
}
