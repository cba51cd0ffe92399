//! Presentation state
//!
//! There are exactly two observable states, keyed off session presence. The
//! "link sent, awaiting click" interval is not tracked; the user completes
//! the emailed link out-of-band and returns through a fresh auth change.

use identity_provider::Session;
use object_storage::StoredObject;

/// Current presentation state of the gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryState {
    /// No active session; nothing may touch the store
    LoggedOut,
    /// An active session and its gallery view
    LoggedIn {
        /// The authenticated principal
        session: Session,
        /// Snapshot of the last successful listing. Empty until the first
        /// successful list, left untouched when a refresh fails.
        view: Vec<StoredObject>,
    },
}

impl GalleryState {
    /// Whether a session is currently active
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn { .. })
    }

    /// The active session, if any
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::LoggedOut => None,
            Self::LoggedIn { session, .. } => Some(session),
        }
    }

    /// The current gallery view; empty when logged out
    #[must_use]
    pub fn view(&self) -> &[StoredObject] {
        match self {
            Self::LoggedOut => &[],
            Self::LoggedIn { view, .. } => view,
        }
    }
}
