// Typed errors for the boundaries that branch on error kind.

use std::path::PathBuf;

use thiserror::Error;

/// Outcome of a failed liveness request, classified so the prober can tell
/// measurement failures apart from programming errors.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("transport error: {0}")]
    Transport(String),
    /// The request could not be built or sent for reasons unrelated to the network.
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl RequestError {
    /// Network-class failures are recorded as unsuccessful events; everything else aborts.
    pub fn is_network(&self) -> bool {
        !matches!(self, RequestError::Invalid(_))
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RequestError::Timeout
        } else if e.is_connect() {
            RequestError::Connect(e.to_string())
        } else if e.is_builder() {
            RequestError::Invalid(e.to_string())
        } else {
            RequestError::Transport(e.to_string())
        }
    }
}

/// Fatal command-line errors, reported with usage before any work starts.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("Invalid cloud provider: {identifier} (valid options: {})", .valid.join(", "))]
    UnknownProvider {
        identifier: String,
        valid: Vec<&'static str>,
    },
    #[error("Results directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
}
