//! Error taxonomy for gallery operations

use identity_provider::IdentityError;
use object_storage::ObjectStorageError;
use thiserror::Error;

/// Result type for gallery operations
pub type GalleryResult<T> = Result<T, GalleryError>;

/// Errors that can occur during gallery operations
///
/// External-service errors are caught at the call site, wrapped here with the
/// source preserved, and never retried.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// The identity provider refused to send a login link
    #[error("Login link request failed: {0}")]
    AuthRequestFailed(#[source] IdentityError),

    /// The identity provider failed to invalidate the session; the local
    /// session is discarded regardless
    #[error("Sign-out failed: {0}")]
    SignOutFailed(#[source] IdentityError),

    /// The gallery listing could not be fetched
    #[error("Failed to list images: {0}")]
    ListFailed(#[source] ObjectStorageError),

    /// The image blob could not be stored
    #[error("Failed to upload image: {0}")]
    UploadFailed(#[source] ObjectStorageError),

    /// The object could not be removed
    #[error("Failed to delete image: {0}")]
    DeleteFailed(#[source] ObjectStorageError),

    /// The operation requires an active session
    #[error("No active session")]
    NotSignedIn,

    /// The named object is not present in the current gallery view
    #[error("Unknown object: {0}")]
    UnknownObject(String),

    /// The blob's declared content type is not an accepted image type
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(mime::Mime),
}
