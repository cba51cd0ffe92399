//! Passwordless identity provider integration (emailed magic links)

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod error;

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

pub use error::{IdentityError, IdentityResult};

/// Default timeout for identity provider requests
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of idle connections to maintain per host
const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 10;

/// An authenticated principal's active login state
///
/// The `user_id` is the opaque, stable identifier under which all of the
/// principal's objects are stored. Session lifecycle (creation on link
/// completion, expiry) is managed entirely by the provider; this struct only
/// carries what the client needs to act on the principal's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque stable identifier of the principal, used as the storage path prefix
    pub user_id: String,
    /// Email address the principal signed in with
    pub email: String,
    /// Bearer token attached to storage and sign-out requests
    pub access_token: String,
}

/// Contract for the external identity provider
///
/// Implemented over HTTP by [`MagicLinkClient`]; tests supply in-memory fakes
/// so no real provider is needed to exercise callers.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Asks the provider to email a one-time sign-in link to `email`.
    ///
    /// Success means the provider accepted the request, not that the address
    /// exists or the email was deliverable. No client-side format validation
    /// is performed on `email`.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Rejected` when the provider refuses the request
    /// and `IdentityError::Network` when it cannot be reached.
    async fn request_magic_link(&self, email: &str) -> IdentityResult<()>;

    /// Invalidates the given session with the provider.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Rejected` or `IdentityError::Network` when the
    /// provider call fails. Callers treat this as best-effort.
    async fn sign_out(&self, session: &Session) -> IdentityResult<()>;
}

/// One-time-password request body for the magic link endpoint
#[derive(Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    create_user: bool,
}

/// HTTP client for a GoTrue-style passwordless auth API
pub struct MagicLinkClient {
    project_url: String,
    api_key: String,
    http_client: Client,
}

impl MagicLinkClient {
    /// Creates a new magic link client
    ///
    /// # Arguments
    ///
    /// * `project_url` - Root URL of the storage project (no trailing path)
    /// * `api_key` - The project's public API key, sent on every request
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client fails to be created
    #[must_use]
    pub fn new(project_url: String, api_key: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            project_url,
            api_key,
            http_client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.project_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for MagicLinkClient {
    #[instrument(skip(self))]
    async fn request_magic_link(&self, email: &str) -> IdentityResult<()> {
        let response = self
            .http_client
            .post(self.endpoint("otp"))
            .header("apikey", &self.api_key)
            .json(&OtpRequest {
                email,
                create_user: true,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("Magic link request accepted");
            return Ok(());
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(IdentityError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    #[instrument(skip(self, session))]
    async fn sign_out(&self, session: &Session) -> IdentityResult<()> {
        let response = self
            .http_client
            .post(self.endpoint("logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("Session invalidated");
            return Ok(());
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(IdentityError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
