use key_core::config::{
    CLIENT_SECRETS_PATH, ENV_ENDPOINT, ENV_PATCH_TARGET, ENV_TIMEOUT_SECS,
};

use std::fs;
use std::path::Path;
use std::process::Output;

use serde_json::{Value, json};
use tempfile::tempdir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// End-to-end tests against the built binary
// Each run gets a clean environment and a tempdir as working directory
// ============================================================================

const BINARY: &str = env!("CARGO_BIN_EXE_ephemeral-key");

async fn run_binary(dir: &Path, vars: &[(&str, String)]) -> Output {
    let mut command = tokio::process::Command::new(BINARY);
    command.current_dir(dir).env_clear();
    for (name, value) in vars {
        command.env(name, value);
    }
    command.output().await.expect("binary should start")
}

fn endpoint(base_uri: &str) -> String {
    format!("{base_uri}{CLIENT_SECRETS_PATH}")
}

/// **VALUE**: Verifies the binary exits 1 and writes nothing without a credential.
///
/// **WHY THIS MATTERS**: Exit status 1 is the only signal a wrapping script gets
/// that the tool was misconfigured rather than the API being down.
#[tokio::test]
async fn given_no_credential_when_binary_runs_then_exits_1_without_output_file() {
    // GIVEN: An empty environment
    let dir = tempdir().unwrap();

    // WHEN: Running the binary
    let output = run_binary(dir.path(), &[(ENV_ENDPOINT, "http://127.0.0.1:9/".to_string())]).await;

    // THEN: Exit 1, remediation on stdout, no key file
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("OPENAI_API_KEY environment variable is not set"));
    assert!(!dir.path().join("ephemeral_key.json").exists());
}

/// **VALUE**: Verifies a 404 answer exits 0 and creates no key file.
#[tokio::test(flavor = "multi_thread")]
async fn given_404_when_binary_runs_then_exits_0_without_output_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();

    let output = run_binary(
        dir.path(),
        &[
            ("OPENAI_API_KEY", "sk-test".to_string()),
            (ENV_ENDPOINT, endpoint(&server.uri())),
        ],
    )
    .await;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("not here"));
    assert!(!dir.path().join("ephemeral_key.json").exists());
}

/// **VALUE**: Verifies the default run writes the key file and patches src/realtime.ts.
///
/// **WHY THIS MATTERS**: This is the tool's everyday use: run it in the project root
/// and the client source picks up a fresh key.
#[tokio::test(flavor = "multi_thread")]
async fn given_success_when_binary_runs_then_writes_key_and_patches_default_target() {
    // GIVEN: A 200 answer and a project layout with src/realtime.ts
    let body = json!({"value": "NEW", "expires_at": 123});
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    let target = dir.path().join("src").join("realtime.ts");
    fs::write(&target, "const apiKey = 'OLD' // expired\n").unwrap();

    // WHEN: Running with only the key and endpoint set
    let output = run_binary(
        dir.path(),
        &[
            ("OPENAI_API_KEY", "sk-test".to_string()),
            (ENV_ENDPOINT, endpoint(&server.uri())),
        ],
    )
    .await;

    // THEN: Exit 0, key file mirrors body, literal replaced
    assert_eq!(output.status.code(), Some(0));
    let saved: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("ephemeral_key.json")).unwrap())
            .unwrap();
    assert_eq!(saved, body);
    assert_eq!(fs::read_to_string(&target).unwrap(), "const apiKey = 'NEW' // expired\n");
}

/// **VALUE**: Verifies the no-patch variant leaves the source file alone.
#[tokio::test(flavor = "multi_thread")]
async fn given_patching_disabled_when_binary_runs_then_source_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": "NEW"})))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    let target = dir.path().join("src").join("realtime.ts");
    fs::write(&target, "const apiKey = 'OLD'\n").unwrap();

    let output = run_binary(
        dir.path(),
        &[
            ("OPENAI_API_KEY", "sk-test".to_string()),
            (ENV_ENDPOINT, endpoint(&server.uri())),
            (ENV_PATCH_TARGET, String::new()),
        ],
    )
    .await;

    assert_eq!(output.status.code(), Some(0));
    assert!(dir.path().join("ephemeral_key.json").exists());
    assert_eq!(fs::read_to_string(&target).unwrap(), "const apiKey = 'OLD'\n");
}

/// **VALUE**: Verifies an invalid override fails fast with exit 1.
#[tokio::test]
async fn given_invalid_timeout_when_binary_runs_then_exits_1() {
    let dir = tempdir().unwrap();

    let output = run_binary(
        dir.path(),
        &[
            ("OPENAI_API_KEY", "sk-test".to_string()),
            (ENV_TIMEOUT_SECS, "soon".to_string()),
        ],
    )
    .await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid configuration"));
}
