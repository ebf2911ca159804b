pub mod config;
pub mod credential;
pub mod error;
pub mod fetcher;
pub mod key_file;
pub mod patcher;
pub mod realtime_client;

#[cfg(test)]
mod tests;

pub use config::FetcherConfig;
pub use fetcher::{CredentialFetcher, FetchReport, PatchStep};
pub use patcher::{PatchOutcome, PatchTarget};
pub use realtime_client::{SessionKind, SessionRequest, SessionResponse};
