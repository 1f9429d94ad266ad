//! Error types for incident fetching.

use thiserror::Error;

/// Errors that can occur when fetching or decoding incident data.
///
/// All variants are recoverable: the caller may retry, subject to the call
/// budget. None of them affect position tracking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network failure or client construction failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Upstream answered with a non-success status.
    #[error("Incident API returned status {0}")]
    Status(u16),

    /// Response body was not valid JSON.
    #[error("Failed to parse response: {0}")]
    Json(String),

    /// Local payload file could not be read.
    #[error("Failed to read incident file: {0}")]
    Read(String),

    /// JSON was valid but not an incident list.
    #[error("Malformed incident payload: {0}")]
    Malformed(String),
}
