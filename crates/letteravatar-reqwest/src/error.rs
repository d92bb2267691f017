//! Internal error types for letteravatar-reqwest.

use thiserror::Error;

/// Result type alias for letteravatar-reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for letteravatar-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl From<Error> for letteravatar_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    letteravatar_core::Error::timeout()
                        .with_message("Request timed out")
                        .with_source(e)
                } else if e.is_connect() {
                    letteravatar_core::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_builder() {
                    letteravatar_core::Error::invalid_input()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    letteravatar_core::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
        }
    }
}
