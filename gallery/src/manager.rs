//! Gallery session manager
//!
//! Single component mediating between UI intent and the two external
//! services. The ownership invariant it maintains: every object key it
//! produces is prefixed by the current session's user identifier. Failures
//! are terminal for their invocation; nothing here retries.

use identity_provider::{IdentityProvider, MagicLinkClient, Session};
use mime::Mime;
use object_storage::{ListOptions, ObjectStorage, StorageApiClient, StoredObject};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::cdn::PublicUrlResolver;
use crate::notice::{Notice, NoticeSink};
use crate::state::GalleryState;
use crate::types::{Environment, GalleryError, GalleryResult};

/// Bucket every gallery object lives in
pub const IMAGES_BUCKET: &str = "images";

/// Fixed page size for listings; only the first page is ever fetched.
/// An intentional scope limit, not a pagination starting point.
const LIST_PAGE_LIMIT: u32 = 100;

/// Returns whether a declared content type passes the input-level image filter
fn is_accepted_image(content_type: &Mime) -> bool {
    *content_type == mime::IMAGE_PNG || *content_type == mime::IMAGE_JPEG
}

/// Mediates sign-in, sign-out, upload, delete, and view refresh for one user
///
/// Holds the session explicitly (no ambient auth state): the embedding
/// application forwards provider auth changes through
/// [`handle_auth_change`](Self::handle_auth_change). All storage paths are
/// `{user_id}/{object_name}`; the store's access policy enforces that a
/// session only ever touches its own prefix.
pub struct GalleryManager<I, S> {
    identity: I,
    storage: S,
    resolver: PublicUrlResolver,
    notices: Box<dyn NoticeSink>,
    state: GalleryState,
}

impl<I, S> GalleryManager<I, S>
where
    I: IdentityProvider,
    S: ObjectStorage,
{
    /// Creates a manager in the logged-out state
    #[must_use]
    pub fn new(
        identity: I,
        storage: S,
        resolver: PublicUrlResolver,
        notices: Box<dyn NoticeSink>,
    ) -> Self {
        Self {
            identity,
            storage,
            resolver,
            notices,
            state: GalleryState::LoggedOut,
        }
    }

    /// Current presentation state
    #[must_use]
    pub const fn state(&self) -> &GalleryState {
        &self.state
    }

    /// Current gallery view; empty when logged out
    #[must_use]
    pub fn view(&self) -> &[StoredObject] {
        self.state.view()
    }

    /// Refreshes the view after a successful mutation.
    /// A failed refresh has already surfaced its own notice.
    async fn refresh_view(&mut self) {
        if let Err(source) = self.list_images().await {
            debug!(%source, "View refresh failed");
        }
    }

    /// Asks the identity provider to email a one-time sign-in link
    ///
    /// `email` is forwarded as-is; no client-side format validation. Success
    /// means the provider accepted the request, so the user is told to check
    /// their email, not that they are signed in.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::AuthRequestFailed` when the provider rejects
    /// the request or cannot be reached.
    pub async fn request_login_link(&self, email: &str) -> GalleryResult<()> {
        let result = self.identity.request_magic_link(email).await;

        match result {
            Ok(()) => {
                info!("Login link request accepted");
                self.notices
                    .push(Notice::info("Check your email for a magic link to log in!"));
                Ok(())
            }
            Err(source) => {
                warn!(%source, "Login link request failed");
                self.notices.push(Notice::error(
                    "Could not send a login link, make sure to use a real email address!",
                ));
                Err(GalleryError::AuthRequestFailed(source))
            }
        }
    }

    /// Applies a provider-side auth state change
    ///
    /// `Some` establishes the session with an empty view and triggers the
    /// initial listing; a failed first load leaves the view empty and has
    /// already been surfaced as a notice. `None` clears the session.
    pub async fn handle_auth_change(&mut self, session: Option<Session>) {
        match session {
            Some(session) => {
                info!(user_id = %session.user_id, "Session established");
                self.state = GalleryState::LoggedIn {
                    session,
                    view: Vec::new(),
                };
                self.refresh_view().await;
            }
            None => {
                info!("Session cleared");
                self.state = GalleryState::LoggedOut;
            }
        }
    }

    /// Signs out, discarding the session locally before telling the provider
    ///
    /// The local transition to logged-out is unconditional: subsequent
    /// operations treat the principal as unauthenticated even when the
    /// provider call fails.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::SignOutFailed` when the provider rejects the
    /// invalidation; the session is already gone from the caller's
    /// perspective.
    pub async fn sign_out(&mut self) -> GalleryResult<()> {
        let GalleryState::LoggedIn { session, .. } =
            std::mem::replace(&mut self.state, GalleryState::LoggedOut)
        else {
            return Ok(());
        };

        info!(user_id = %session.user_id, "Signed out locally");

        if let Err(source) = self.identity.sign_out(&session).await {
            warn!(%source, "Identity provider sign-out failed");
            self.notices
                .push(Notice::error("Sign-out did not complete cleanly"));
            return Err(GalleryError::SignOutFailed(source));
        }

        Ok(())
    }

    /// Fetches the first page of the session's objects and replaces the view
    ///
    /// Lists under `{user_id}/`, up to [`LIST_PAGE_LIMIT`] entries, name
    /// ascending. On failure the previous view is kept (empty if this was
    /// the first load).
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::NotSignedIn` without touching the store when no
    /// session is active, and `GalleryError::ListFailed` when the storage
    /// call fails.
    pub async fn list_images(&mut self) -> GalleryResult<()> {
        let GalleryState::LoggedIn { session, .. } = &self.state else {
            return Err(GalleryError::NotSignedIn);
        };

        let prefix = format!("{}/", session.user_id);
        let options = ListOptions {
            limit: LIST_PAGE_LIMIT,
            ..ListOptions::default()
        };

        let result = self
            .storage
            .list(&session.access_token, &prefix, &options)
            .await;

        match result {
            Ok(objects) => {
                debug!(count = objects.len(), "Refreshed gallery view");
                if let GalleryState::LoggedIn { view, .. } = &mut self.state {
                    *view = objects;
                }
                Ok(())
            }
            Err(source) => {
                error!(%source, "Failed to list images");
                self.notices.push(Notice::error("Error loading images"));
                Err(GalleryError::ListFailed(source))
            }
        }
    }

    /// Stores an image blob under a freshly generated name
    ///
    /// The name is a UUID v4 string, so collisions are negligible and the
    /// store never overwrites. On success the view is refreshed by a new
    /// listing (no optimistic insert) and the generated name is returned.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::NotSignedIn` without touching the store when no
    /// session is active, `GalleryError::UnsupportedMediaType` when the
    /// declared content type fails the image filter, and
    /// `GalleryError::UploadFailed` when the storage call fails (the view is
    /// left unchanged).
    pub async fn upload_image(
        &mut self,
        content: Vec<u8>,
        content_type: &Mime,
    ) -> GalleryResult<String> {
        let GalleryState::LoggedIn { session, .. } = &self.state else {
            return Err(GalleryError::NotSignedIn);
        };

        if !is_accepted_image(content_type) {
            warn!(%content_type, "Rejected upload with non-image content type");
            self.notices
                .push(Notice::error("Only PNG and JPEG images can be uploaded"));
            return Err(GalleryError::UnsupportedMediaType(content_type.clone()));
        }

        let name = Uuid::new_v4().to_string();
        let path = format!("{}/{name}", session.user_id);

        let result = self
            .storage
            .upload(&session.access_token, &path, content, content_type)
            .await;

        match result {
            Ok(()) => {
                info!(%path, "Uploaded image");
                self.refresh_view().await;
                Ok(name)
            }
            Err(source) => {
                error!(%source, "Failed to upload image");
                self.notices.push(Notice::error("Error uploading image"));
                Err(GalleryError::UploadFailed(source))
            }
        }
    }

    /// Deletes one object previously returned by a listing
    ///
    /// `name` must be present in the current view; stale or forged names are
    /// rejected before any destructive call is issued. On success the view is
    /// refreshed; on storage failure the view is left as-is, which is correct
    /// since the object still exists.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::NotSignedIn` without touching the store when no
    /// session is active, `GalleryError::UnknownObject` when `name` is not in
    /// the current view, and `GalleryError::DeleteFailed` when the storage
    /// call fails.
    pub async fn delete_image(&mut self, name: &str) -> GalleryResult<()> {
        let GalleryState::LoggedIn { session, view } = &self.state else {
            return Err(GalleryError::NotSignedIn);
        };

        if !view.iter().any(|object| object.name == name) {
            warn!(name, "Refusing to delete object absent from the current view");
            self.notices
                .push(Notice::error("That image is no longer in your gallery"));
            return Err(GalleryError::UnknownObject(name.to_string()));
        }

        let path = format!("{}/{name}", session.user_id);

        let result = self.storage.remove(&session.access_token, &[path]).await;

        match result {
            Ok(()) => {
                info!(name, "Deleted image");
                self.refresh_view().await;
                Ok(())
            }
            Err(source) => {
                error!(%source, "Failed to delete image");
                self.notices.push(Notice::error("Error deleting image"));
                Err(GalleryError::DeleteFailed(source))
            }
        }
    }

    /// Public URL of one of the session's objects
    ///
    /// Pure string composition over the configured CDN base; performs no I/O.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::NotSignedIn` when no session is active.
    pub fn public_url(&self, object_name: &str) -> GalleryResult<String> {
        let session = self.state.session().ok_or(GalleryError::NotSignedIn)?;
        Ok(self.resolver.resolve(&session.user_id, object_name))
    }
}

impl GalleryManager<MagicLinkClient, StorageApiClient> {
    /// Creates a manager wired to the HTTP clients for `environment`
    ///
    /// Reads the project URL and API key once; neither is validated beyond
    /// presence, a misconfigured URL simply yields non-resolving requests.
    #[must_use]
    pub fn from_environment(environment: &Environment, notices: Box<dyn NoticeSink>) -> Self {
        let project_url = environment.project_url();
        let api_key = environment.api_key();

        Self::new(
            MagicLinkClient::new(project_url.clone(), api_key.clone()),
            StorageApiClient::new(project_url.clone(), IMAGES_BUCKET.to_string(), api_key),
            PublicUrlResolver::new(&project_url, IMAGES_BUCKET),
            notices,
        )
    }
}
