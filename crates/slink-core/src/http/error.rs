//! Transport error type.

use thiserror::Error;

/// Failure of a single transport request.
///
/// Kept separate from session errors: the resolver absorbs these when a
/// redirect probe fails instead of surfacing them.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, TLS, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The response status is an error and was not listed as acceptable.
    #[error("{method} {url} returned HTTP {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u32,
    },
    /// The request URL could not be built.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl TransportError {
    /// HTTP status for [`TransportError::Status`].
    pub fn status(&self) -> Option<u32> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
