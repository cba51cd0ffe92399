//! Error types for object storage operations

use thiserror::Error;

/// Result type for object storage operations
pub type StorageResult<T> = Result<T, ObjectStorageError>;

/// Errors that can occur during object storage operations
///
/// The store's failures are deliberately not categorized further (network vs.
/// authorization vs. quota); every failure is terminal for that invocation
/// and is never retried by this crate.
#[derive(Error, Debug)]
pub enum ObjectStorageError {
    /// The storage API answered with a non-success status
    #[error("Storage API error (status {status}): {message}")]
    Api {
        /// HTTP status code returned by the storage API
        status: u16,
        /// Raw error body returned by the storage API
        message: String,
    },

    /// The request never reached the storage API or the response was unreadable
    #[error("Storage network error: {0}")]
    Network(#[from] reqwest::Error),
}
