use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use bytes::Bytes;

use crate::{Blob, BlobStore, StoreError};

/// In-process blob store for tests and local development. Same per-key
/// semantics as the bucket: last write wins, no versioning.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Blob>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Blob, StoreError> {
        self.blobs
            .read()
            .expect("blob store lock poisoned")
            .get(key)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn put(
        &self,
        key: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.blobs.write().expect("blob store lock poisoned").insert(
            key.to_string(),
            Blob {
                key: key.to_string(),
                content,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.blobs
            .write()
            .expect("blob store lock poisoned")
            .remove(key)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .blobs
            .read()
            .expect("blob store lock poisoned")
            .keys()
            .cloned()
            .collect())
    }
}
