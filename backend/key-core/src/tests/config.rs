// Unit tests for config resolution
// Lookups are plain maps, so the real process environment is never touched

use crate::config::{
    DEFAULT_ENDPOINT, ENV_API_KEY_ENV, ENV_ENDPOINT, ENV_MODEL, ENV_OUTPUT,
    ENV_PATCH_IDENTIFIER, ENV_PATCH_TARGET, ENV_TIMEOUT_SECS, FetcherConfig,
};
use crate::error::ConfigError;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

/// **VALUE**: Verifies the defaults match the client-secrets contract.
///
/// **WHY THIS MATTERS**: With no overrides the tool must behave exactly like the
/// one-shot script it replaces: same endpoint, model, timeout, file names.
///
/// **BUG THIS CATCHES**: Typos in any of the constants.
#[test]
fn given_empty_environment_when_resolved_then_uses_defaults() {
    // GIVEN: No variables at all
    let lookup = lookup_from(&[]);

    // WHEN: Resolving config
    let config = FetcherConfig::from_lookup(lookup).expect("defaults are valid");

    // THEN: Every default is in place
    assert_eq!(config.api_key_env, "OPENAI_API_KEY");
    assert_eq!(
        config.endpoint.as_str(),
        "https://api.openai.com/v1/realtime/client_secrets"
    );
    assert_eq!(DEFAULT_ENDPOINT, config.endpoint.as_str());
    assert_eq!(config.model, "gpt-realtime");
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.key_file, PathBuf::from("ephemeral_key.json"));

    let target = config.patch_target.expect("patching is on by default");
    assert_eq!(target.path, PathBuf::from("src/realtime.ts"));
    assert_eq!(target.identifier, "apiKey");
}

/// **VALUE**: Verifies every override variable is honoured.
///
/// **WHY THIS MATTERS**: Tests and alternative deployments point the tool at a
/// different endpoint or output path purely through the environment.
#[test]
fn given_overrides_when_resolved_then_values_replace_defaults() {
    // GIVEN: Every override set
    let lookup = lookup_from(&[
        (ENV_API_KEY_ENV, "MY_KEY"),
        (ENV_ENDPOINT, "http://127.0.0.1:9999/v1/realtime/client_secrets"),
        (ENV_MODEL, "gpt-realtime-mini"),
        (ENV_TIMEOUT_SECS, " 30 "),
        (ENV_OUTPUT, "out/key.json"),
        (ENV_PATCH_TARGET, "web/client.ts"),
        (ENV_PATCH_IDENTIFIER, "sessionKey"),
    ]);

    // WHEN: Resolving config
    let config = FetcherConfig::from_lookup(lookup).expect("overrides are valid");

    // THEN: Overrides win
    assert_eq!(config.api_key_env, "MY_KEY");
    assert_eq!(config.endpoint.port(), Some(9999));
    assert_eq!(config.model, "gpt-realtime-mini");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.key_file, PathBuf::from("out/key.json"));

    let target = config.patch_target.expect("patch target set");
    assert_eq!(target.path, PathBuf::from("web/client.ts"));
    assert_eq!(target.identifier, "sessionKey");
}

/// **VALUE**: Verifies an empty patch target disables the patch step.
///
/// **WHY THIS MATTERS**: This is how the no-patch variant of the tool is selected.
/// Treating empty as "unset" would silently re-enable patching.
#[test]
fn given_empty_patch_target_when_resolved_then_patching_disabled() {
    let lookup = lookup_from(&[(ENV_PATCH_TARGET, "")]);

    let config = FetcherConfig::from_lookup(lookup).expect("valid config");

    assert!(config.patch_target.is_none());
}

/// **VALUE**: Verifies a malformed timeout is reported, not defaulted.
///
/// **BUG THIS CATCHES**: Would catch `.parse().unwrap_or(10)` style fallbacks that
/// hide operator mistakes.
#[test]
fn given_non_numeric_timeout_when_resolved_then_returns_parse_error() {
    let lookup = lookup_from(&[(ENV_TIMEOUT_SECS, "ten")]);

    let result = FetcherConfig::from_lookup(lookup);

    match result {
        Err(ConfigError::Parse { variable, .. }) => assert_eq!(variable, ENV_TIMEOUT_SECS),
        other => panic!("Expected Parse error, got {other:?}"),
    }
}

/// **VALUE**: Verifies out-of-range timeouts are rejected.
#[test]
fn given_zero_or_huge_timeout_when_resolved_then_returns_validation_error() {
    for value in ["0", "301"] {
        let lookup = lookup_from(&[(ENV_TIMEOUT_SECS, value)]);

        let result = FetcherConfig::from_lookup(lookup);

        assert!(
            matches!(result, Err(ConfigError::Validation { .. })),
            "timeout {value} should be rejected"
        );
    }
}

/// **VALUE**: Verifies non-HTTP endpoints and bad URLs are rejected.
#[test]
fn given_bad_endpoint_when_resolved_then_returns_error() {
    let bad_scheme = FetcherConfig::from_lookup(lookup_from(&[(ENV_ENDPOINT, "ftp://example.com/x")]));
    assert!(matches!(bad_scheme, Err(ConfigError::Validation { .. })));

    let not_a_url = FetcherConfig::from_lookup(lookup_from(&[(ENV_ENDPOINT, "not a url")]));
    assert!(matches!(not_a_url, Err(ConfigError::Parse { .. })));
}

/// **VALUE**: Verifies identifiers that would break the literal pattern are rejected.
///
/// **WHY THIS MATTERS**: The identifier is spliced into `const <id> = '...'`. Spaces or
/// quotes would make the pattern match something other than an assignment.
#[test]
fn given_invalid_identifier_when_resolved_then_returns_validation_error() {
    for identifier in ["api key", "1key", "key'"] {
        let lookup = lookup_from(&[(ENV_PATCH_IDENTIFIER, identifier)]);

        let result = FetcherConfig::from_lookup(lookup);

        assert!(
            matches!(result, Err(ConfigError::Validation { .. })),
            "identifier {identifier:?} should be rejected"
        );
    }
}

/// **VALUE**: Verifies validation errors carry their source location.
#[test]
fn given_validation_error_when_formatted_then_includes_location() {
    let err = FetcherConfig::from_lookup(lookup_from(&[(ENV_MODEL, "x"), (ENV_TIMEOUT_SECS, "0")]))
        .expect_err("zero timeout is invalid");

    let message = err.to_string();
    assert!(message.contains("Config Validation Error"));
    assert!(message.contains("config"), "location missing: {message}");
}
