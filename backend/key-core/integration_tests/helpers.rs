use key_core::config::CLIENT_SECRETS_PATH;
use key_core::{FetcherConfig, PatchTarget};

use common::RedactedApiKey;

use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use url::Url;

pub const TEST_API_KEY: &str = "sk-test-integration-key";

pub fn api_key() -> RedactedApiKey {
    RedactedApiKey::new(TEST_API_KEY.to_string())
}

/// Config pointing at `base_uri`, writing into `dir`, patching disabled.
pub fn config_for(base_uri: &str, dir: &Path) -> FetcherConfig {
    FetcherConfig {
        endpoint: Url::parse(&format!("{base_uri}{CLIENT_SECRETS_PATH}")).unwrap(),
        timeout: Duration::from_secs(5),
        key_file: dir.join("ephemeral_key.json"),
        patch_target: None,
        ..FetcherConfig::default()
    }
}

pub fn with_patch_target(mut config: FetcherConfig, path: &Path) -> FetcherConfig {
    config.patch_target = Some(PatchTarget::new(path, "apiKey"));
    config
}

/// A localhost URI nothing is listening on.
pub fn unused_local_uri() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
