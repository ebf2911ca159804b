pub mod config;
pub mod credential;
pub mod fetch;
pub mod key_file;
pub mod patch;
pub mod realtime_client;

pub use config::ConfigError;
pub use credential::CredentialError;
pub use fetch::FetchError;
pub use key_file::KeyFileError;
pub use patch::PatchError;
pub use realtime_client::RealtimeClientError;
