use reqwest::StatusCode;
use thiserror::Error;

/// Every network-facing operation resolves to this error family; no raw
/// transport error or panic ever reaches the presentation layer.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Input was empty after trimming. Caught before any network call.
    #[error("input must not be empty")]
    EmptyInput,
    #[error("short link not found")]
    NotFound,
    #[error("request failed with status {0}")]
    RequestFailed(StatusCode),
    /// The redirect probe saw something other than a 3xx. A 2xx here means
    /// the redirect was misconfigured or already followed.
    #[error("expected a redirect, got status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
