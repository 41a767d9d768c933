mod memory;
mod s3;

pub use memory::*;
pub use s3::*;

use bytes::Bytes;

use crate::StoreError;

/// A named payload with a content type, as held by the external object store.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub key: String,
    pub content: Bytes,
    pub content_type: String,
}

/// Contract the gateway holds against the external bucket. One call per
/// request, no caching, no retries; whatever the backend does per key
/// (last write wins) is what callers observe.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetches a blob, `StoreError::NotFound` when the key is absent.
    async fn get(&self, key: &str) -> Result<Blob, StoreError>;

    /// Creates or unconditionally overwrites the blob at `key`.
    async fn put(&self, key: &str, content: Bytes, content_type: &str)
    -> Result<(), StoreError>;

    /// Removes the key, `StoreError::NotFound` when it never existed.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Every key in the bucket. Implementations must walk the backend's full
    /// listing, not just its first page.
    async fn list(&self) -> Result<Vec<String>, StoreError>;
}

/// Blob keys are conventionally `.json` suffixed; the gateway appends the
/// suffix for callers that pass a bare name.
pub fn resolve_key(name: &str) -> String {
    if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{name}.json")
    }
}
