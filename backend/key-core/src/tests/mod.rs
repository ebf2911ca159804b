mod config;
mod credential;
mod fetch_error;
mod patcher;
