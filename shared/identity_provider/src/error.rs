//! Error types for identity provider operations

use thiserror::Error;

/// Result type for identity provider operations
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Errors that can occur during identity provider operations
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The provider rejected the request (malformed address, rate limit, ...)
    #[error("Identity provider rejected the request (status {status}): {message}")]
    Rejected {
        /// HTTP status code returned by the provider
        status: u16,
        /// Raw error body returned by the provider
        message: String,
    },

    /// The request never reached the provider or the response was unreadable
    #[error("Identity provider network error: {0}")]
    Network(#[from] reqwest::Error),
}
