//! Bucket-based object storage integration (path-keyed blobs, prefix listing)

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod error;

use std::time::Duration;

use chrono::{DateTime, Utc};
use mime::Mime;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use error::{ObjectStorageError, StorageResult};

/// Default timeout for storage API requests
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of idle connections to maintain per host
const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 10;

/// A single object as reported by a prefix listing
///
/// Only `name` is load-bearing for callers; the timestamps and id are
/// passthrough metadata from the storage API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Object name, unique within its path prefix
    pub name: String,
    /// Storage-assigned object id, absent for placeholder entries
    #[serde(default)]
    pub id: Option<String>,
    /// Creation timestamp reported by the store
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last-update timestamp reported by the store
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoredObject {
    /// Creates an object record carrying only a name
    #[must_use]
    pub const fn named(name: String) -> Self {
        Self {
            name,
            id: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Column a listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    /// Sort by object name
    Name,
}

/// Direction a listing is sorted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

/// Sort clause for a prefix listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortBy {
    /// Column to sort on
    pub column: SortColumn,
    /// Sort direction
    pub order: SortOrder,
}

/// Options for a prefix listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum number of entries to return
    pub limit: u32,
    /// Number of entries to skip
    pub offset: u32,
    /// Sort clause applied by the store
    pub sort: SortBy,
}

impl Default for ListOptions {
    /// First page of up to 100 entries, name ascending
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            sort: SortBy {
                column: SortColumn::Name,
                order: SortOrder::Asc,
            },
        }
    }
}

/// Contract for the external object store
///
/// All paths are of the form `{user_identifier}/{object_name}`; the bucket is
/// fixed at client construction. The access token identifies the principal to
/// the store, which enforces that a principal only touches its own prefix.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Lists objects under `prefix`, honoring `options`.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStorageError` if the storage call fails.
    async fn list(
        &self,
        access_token: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> StorageResult<Vec<StoredObject>>;

    /// Stores `content` at `path`, declaring `content_type`.
    ///
    /// Objects are never mutated in place; a path is written at most once.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStorageError` if the storage call fails.
    async fn upload(
        &self,
        access_token: &str,
        path: &str,
        content: Vec<u8>,
        content_type: &Mime,
    ) -> StorageResult<()>;

    /// Removes the objects at `paths`.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStorageError` if the storage call fails.
    async fn remove(&self, access_token: &str, paths: &[String]) -> StorageResult<()>;
}

/// Listing request body for the storage API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: u32,
    offset: u32,
    sort_by: SortBy,
}

/// Removal request body for the storage API
#[derive(Serialize)]
struct RemoveRequest<'a> {
    prefixes: &'a [String],
}

/// HTTP client for a Supabase-style storage API, pinned to one bucket
pub struct StorageApiClient {
    project_url: String,
    bucket: String,
    api_key: String,
    http_client: Client,
}

impl StorageApiClient {
    /// Creates a new storage API client
    ///
    /// # Arguments
    ///
    /// * `project_url` - Root URL of the storage project (no trailing path)
    /// * `bucket` - Bucket every operation of this client is scoped to
    /// * `api_key` - The project's public API key, sent on every request
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client fails to be created
    #[must_use]
    pub fn new(project_url: String, bucket: String, api_key: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            project_url,
            bucket,
            api_key,
            http_client,
        }
    }

    fn storage_root(&self) -> String {
        format!(
            "{}/storage/v1/object",
            self.project_url.trim_end_matches('/')
        )
    }

    fn list_endpoint(&self) -> String {
        format!("{}/list/{}", self.storage_root(), self.bucket)
    }

    fn object_endpoint(&self, path: &str) -> String {
        format!("{}/{}/{path}", self.storage_root(), self.bucket)
    }

    fn bucket_endpoint(&self) -> String {
        format!("{}/{}", self.storage_root(), self.bucket)
    }

    async fn check_status(response: reqwest::Response) -> StorageResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(ObjectStorageError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl ObjectStorage for StorageApiClient {
    #[instrument(skip(self, access_token))]
    async fn list(
        &self,
        access_token: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> StorageResult<Vec<StoredObject>> {
        let response = self
            .http_client
            .post(self.list_endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .json(&ListRequest {
                prefix,
                limit: options.limit,
                offset: options.offset,
                sort_by: options.sort,
            })
            .send()
            .await?;

        let objects: Vec<StoredObject> = Self::check_status(response).await?.json().await?;
        debug!(count = objects.len(), "Listed objects");
        Ok(objects)
    }

    #[instrument(skip(self, access_token, content))]
    async fn upload(
        &self,
        access_token: &str,
        path: &str,
        content: Vec<u8>,
        content_type: &Mime,
    ) -> StorageResult<()> {
        let response = self
            .http_client
            .post(self.object_endpoint(path))
            .header("apikey", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type.as_ref())
            .bearer_auth(access_token)
            .body(content)
            .send()
            .await?;

        Self::check_status(response).await?;
        debug!("Uploaded object");
        Ok(())
    }

    #[instrument(skip(self, access_token))]
    async fn remove(&self, access_token: &str, paths: &[String]) -> StorageResult<()> {
        let response = self
            .http_client
            .delete(self.bucket_endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .json(&RemoveRequest { prefixes: paths })
            .send()
            .await?;

        Self::check_status(response).await?;
        debug!(count = paths.len(), "Removed objects");
        Ok(())
    }
}
