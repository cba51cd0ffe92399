//! Public CDN URL resolution
//!
//! Maps a stored object's path to a publicly fetchable URL by pure string
//! composition. No network call, no failure mode; public readability of the
//! resulting path is configured on the store side, per-object under the
//! owner's prefix.

/// Resolves storage paths to public CDN URLs for one bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrlResolver {
    base_url: String,
}

impl PublicUrlResolver {
    /// Creates a resolver for `bucket` under the given project root URL
    #[must_use]
    pub fn new(project_url: &str, bucket: &str) -> Self {
        Self {
            base_url: format!(
                "{}/storage/v1/object/public/{bucket}/",
                project_url.trim_end_matches('/')
            ),
        }
    }

    /// The fixed CDN base URL, ending in `/`
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public URL of the object `object_name` owned by `user_id`
    #[must_use]
    pub fn resolve(&self, user_id: &str, object_name: &str) -> String {
        format!("{}{user_id}/{object_name}", self.base_url)
    }
}
