mod error;
mod fetcher;
mod helpers;
mod key_file;
mod patcher;
