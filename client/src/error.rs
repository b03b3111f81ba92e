//! Error types for the Order API client

use order_api_core::DefinitionError;
use thiserror::Error;

/// Errors that can occur when invoking the Order API.
///
/// A response with a non-2xx status is not an error: it comes back as a
/// [`PutOrderIdResponse`](crate::PutOrderIdResponse).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The base URL is unusable
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// The URL as given
        url: String,
        /// What is wrong with it
        reason: String,
    },

    /// The embedded API document is unusable or a path value is missing
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// The embedded API document does not declare the operation
    #[error("Operation {0} is not declared")]
    MissingOperation(String),

    /// Request body serialization failed
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The request never produced a response (connection refused, timeout,
    /// body read failure)
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// `true` if no connection could be established.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// `true` if the transport timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
