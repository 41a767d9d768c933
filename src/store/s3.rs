use anyhow::anyhow;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region},
    error::SdkError,
    operation::{get_object::GetObjectError, head_object::HeadObjectError},
};
use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};

use crate::{Blob, BlobStore, StorageConfig, StoreError};

/// Blob store backed by an S3-compatible bucket, driven through aws-sdk-s3.
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    #[instrument(skip_all, fields(storage_url = sconfig.url()))]
    pub async fn connect(sconfig: &StorageConfig, secret: &SecretString) -> Self {
        let credit = Credentials::new(
            &sconfig.access_key,
            secret.expose_secret(),
            None,
            None,
            "blobgate",
        );
        let region = Region::new(sconfig.region.to_string());
        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credit)
            .endpoint_url(sconfig.url.to_string())
            .load()
            .await;
        Self {
            client: Client::new(&shared_config),
            bucket: sconfig.bucket.clone(),
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for S3BlobStore {
    async fn get(&self, key: &str) -> Result<Blob, StoreError> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(s) if matches!(s.err(), GetObjectError::NoSuchKey(_)) => {
                    StoreError::NotFound
                }
                _ => StoreError::Backend(e.into()),
            })?;

        let content_type = object
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let content = object
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Backend(e.into()))?
            .into_bytes();

        Ok(Blob {
            key: key.to_string(),
            content,
            content_type,
        })
    }

    async fn put(
        &self,
        key: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(content.into())
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.into()))
            .inspect_err(|e| error!("{}", e))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        // DeleteObject succeeds on absent keys, so check first to keep the
        // not-found signal.
        self.client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(s) if matches!(s.err(), HeadObjectError::NotFound(_)) => {
                    StoreError::NotFound
                }
                _ => StoreError::Backend(e.into()),
            })?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.into()))
            .inspect_err(|e| error!("{}", e))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let keys = collect_all_keys(self).await?;
        debug!(count = keys.len(), "listed bucket keys");
        Ok(keys)
    }
}

/// One page of a bucket listing, with the token for the page after it.
pub(crate) struct KeyPage {
    pub keys: Vec<String>,
    pub next: Option<String>,
}

/// A listing backend that hands out pages keyed by continuation token.
#[async_trait::async_trait]
pub(crate) trait PageSource {
    async fn fetch(&self, continuation: Option<String>) -> Result<KeyPage, StoreError>;
}

/// Drains a [`PageSource`] until it stops returning a continuation token.
/// The bucket's listing is paginated; surfacing only the first page would
/// silently truncate the key set.
pub(crate) async fn collect_all_keys<S: PageSource + ?Sized>(
    source: &S,
) -> Result<Vec<String>, StoreError> {
    let mut keys = vec![];
    let mut continuation = None;
    loop {
        let mut page = source.fetch(continuation).await?;
        keys.append(&mut page.keys);
        continuation = page.next;
        if continuation.is_none() {
            break;
        }
    }
    Ok(keys)
}

#[async_trait::async_trait]
impl PageSource for S3BlobStore {
    async fn fetch(&self, continuation: Option<String>) -> Result<KeyPage, StoreError> {
        let mut req = self.client.list_objects_v2().bucket(&self.bucket);
        if let Some(token) = continuation {
            req = req.continuation_token(token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.into()))?;
        let mut keys = vec![];
        if let Some(contents) = resp.contents {
            for obj in contents {
                keys.push(
                    obj.key
                        .ok_or_else(|| StoreError::Backend(anyhow!("listing entry without key")))?,
                );
            }
        }
        Ok(KeyPage {
            keys,
            next: resp.next_continuation_token,
        })
    }
}
