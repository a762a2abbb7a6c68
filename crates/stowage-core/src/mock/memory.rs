use std::collections::{BTreeMap, HashSet};
use std::io;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use futures::StreamExt;
use futures::stream;
use jiff::Timestamp;

use crate::types::{BucketInfo, DeleteFailure, ObjectContent, ObjectDownload, ObjectInfo};
use crate::{Error, Result, StorageProvider};

/// Host used in presigned URLs issued by [`MemoryProvider`].
const MEMORY_ENDPOINT: &str = "http://memory.local";

/// Expiry reported in presigned URLs, matching the S3 maximum of seven days.
const PRESIGNED_EXPIRY_SECS: u64 = 604_800;

/// Errors raised by [`MemoryProvider`], modelled on the S3 error codes.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// The bucket does not exist.
    #[error("NoSuchBucket: bucket '{0}' does not exist")]
    NoSuchBucket(String),

    /// The bucket already exists.
    #[error("BucketAlreadyOwnedByYou: bucket '{0}' already exists")]
    BucketAlreadyOwned(String),

    /// The bucket still holds objects.
    #[error("BucketNotEmpty: bucket '{0}' is not empty")]
    BucketNotEmpty(String),

    /// The key does not exist in the bucket.
    #[error("NoSuchKey: object '{key}' does not exist in bucket '{bucket}'")]
    NoSuchKey { bucket: String, key: String },

    /// The payload length differs from the declared size.
    #[error("IncompleteBody: expected {expected} bytes, received {actual}")]
    IncompleteBody { expected: u64, actual: u64 },
}

#[derive(Debug)]
struct MemoryObject {
    data: Bytes,
    content_type: String,
    etag: String,
    last_modified: Timestamp,
}

#[derive(Debug)]
struct MemoryBucket {
    created_at: Timestamp,
    objects: BTreeMap<String, MemoryObject>,
}

#[derive(Debug, Default)]
struct MemoryState {
    buckets: BTreeMap<String, MemoryBucket>,
    failing_removals: HashSet<String>,
    next_version: u64,
}

/// Storage provider that keeps buckets and objects in memory.
///
/// Clones share the same state. Objects are listed in key order, as S3 does.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later removal of `key` fail with `AccessDenied`.
    pub fn fail_removal_of(&self, key: impl Into<String>) {
        self.write().failing_removals.insert(key.into());
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl StorageProvider for MemoryProvider {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        Ok(self.read().buckets.contains_key(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut state = self.write();
        if state.buckets.contains_key(bucket) {
            return Err(Error::provider(
                "create_bucket",
                MemoryError::BucketAlreadyOwned(bucket.to_owned()),
            ));
        }

        state.buckets.insert(bucket.to_owned(), MemoryBucket {
            created_at: Timestamp::now(),
            objects: BTreeMap::new(),
        });
        Ok(())
    }

    async fn remove_bucket(&self, bucket: &str) -> Result<()> {
        let mut state = self.write();
        match state.buckets.get(bucket) {
            None => Err(Error::provider(
                "remove_bucket",
                MemoryError::NoSuchBucket(bucket.to_owned()),
            )),
            Some(entry) if !entry.objects.is_empty() => Err(Error::provider(
                "remove_bucket",
                MemoryError::BucketNotEmpty(bucket.to_owned()),
            )),
            Some(_) => {
                state.buckets.remove(bucket);
                Ok(())
            }
        }
    }

    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let buckets = self
            .read()
            .buckets
            .iter()
            .map(|(name, entry)| BucketInfo::new(name).with_creation_date(entry.created_at))
            .collect();
        Ok(buckets)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: ObjectContent,
        content_type: &str,
    ) -> Result<Option<String>> {
        let expected = content.size();
        let data = content.into_bytes().await?;

        if let Some(expected) = expected
            && expected != data.len() as u64
        {
            return Err(Error::provider("put_object", MemoryError::IncompleteBody {
                expected,
                actual: data.len() as u64,
            }));
        }

        let mut state = self.write();
        state.next_version += 1;
        let etag = format!("{:032x}", state.next_version);

        let entry = state.buckets.get_mut(bucket).ok_or_else(|| {
            Error::provider("put_object", MemoryError::NoSuchBucket(bucket.to_owned()))
        })?;

        entry.objects.insert(key.to_owned(), MemoryObject {
            data,
            content_type: content_type.to_owned(),
            etag: etag.clone(),
            last_modified: Timestamp::now(),
        });

        Ok(Some(etag))
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        let state = self.read();
        let entry = state.buckets.get(bucket).ok_or_else(|| {
            Error::provider("list_objects", MemoryError::NoSuchBucket(bucket.to_owned()))
        })?;

        let objects = entry
            .objects
            .iter()
            .map(|(key, object)| {
                ObjectInfo::new(key, object.data.len() as u64)
                    .with_last_modified(object.last_modified)
                    .with_etag(&object.etag)
                    .with_content_type(&object.content_type)
            })
            .collect();
        Ok(objects)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectDownload> {
        let state = self.read();
        let object = state
            .buckets
            .get(bucket)
            .ok_or_else(|| {
                Error::provider("get_object", MemoryError::NoSuchBucket(bucket.to_owned()))
            })?
            .objects
            .get(key)
            .ok_or_else(|| {
                Error::provider("get_object", MemoryError::NoSuchKey {
                    bucket: bucket.to_owned(),
                    key: key.to_owned(),
                })
            })?;

        let body = stream::iter([Ok::<_, io::Error>(object.data.clone())]).boxed();
        Ok(
            ObjectDownload::new(bucket, key, object.data.len() as u64, body)
                .with_content_type(&object.content_type)
                .with_etag(&object.etag),
        )
    }

    async fn remove_objects(&self, bucket: &str, keys: Vec<String>) -> Result<Vec<DeleteFailure>> {
        let mut state = self.write();
        let MemoryState {
            buckets,
            failing_removals,
            ..
        } = &mut *state;

        let entry = buckets.get_mut(bucket).ok_or_else(|| {
            Error::provider("remove_objects", MemoryError::NoSuchBucket(bucket.to_owned()))
        })?;

        let mut failures = Vec::new();
        for key in keys {
            if failing_removals.contains(&key) {
                failures.push(DeleteFailure::new(key, "AccessDenied", "Access Denied."));
                continue;
            }
            // Missing keys count as removed.
            entry.objects.remove(&key);
        }

        Ok(failures)
    }

    async fn presigned_get_url(&self, bucket: &str, key: &str) -> Result<String> {
        let now = Timestamp::now();
        let date = now.strftime("%Y%m%d").to_string();
        let amz_date = now.strftime("%Y%m%dT%H%M%SZ").to_string();

        let path = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let credential = urlencoding::encode(&format!("memory/{date}/us-east-1/s3/aws4_request"))
            .into_owned();

        Ok(format!(
            "{MEMORY_ENDPOINT}/{bucket}/{path}?X-Amz-Algorithm=AWS4-HMAC-SHA256\
             &X-Amz-Credential={credential}&X-Amz-Date={amz_date}\
             &X-Amz-Expires={PRESIGNED_EXPIRY_SECS}&X-Amz-SignedHeaders=host"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_state() {
        let provider = MemoryProvider::new();
        let clone = provider.clone();

        provider.create_bucket("shared").await.unwrap();
        assert!(clone.bucket_exists("shared").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_rejects_size_mismatch() {
        let provider = MemoryProvider::new();
        provider.create_bucket("b").await.unwrap();

        let content = ObjectContent::from_stream(
            stream::iter([Ok::<_, io::Error>(Bytes::from_static(b"abc"))]),
            Some(5),
        );
        let error = provider
            .put_object("b", "k", content, "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Provider { operation: "put_object", .. }));
        assert!(provider.list_objects("b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_objects_listed_in_key_order() {
        let provider = MemoryProvider::new();
        provider.create_bucket("b").await.unwrap();

        for key in ["c", "a/2", "a/1", "b"] {
            provider
                .put_object("b", key, ObjectContent::from_bytes(key.to_owned()), "text/plain")
                .await
                .unwrap();
        }

        let keys: Vec<_> = provider
            .list_objects("b")
            .await
            .unwrap()
            .into_iter()
            .map(|object| object.key)
            .collect();
        assert_eq!(keys, ["a/1", "a/2", "b", "c"]);
    }

    #[tokio::test]
    async fn test_overwrite_changes_etag() {
        let provider = MemoryProvider::new();
        provider.create_bucket("b").await.unwrap();

        let first = provider
            .put_object("b", "k", ObjectContent::from_bytes("one"), "text/plain")
            .await
            .unwrap();
        let second = provider
            .put_object("b", "k", ObjectContent::from_bytes("two"), "text/plain")
            .await
            .unwrap();
        assert_ne!(first, second);

        let body = provider.get_object("b", "k").await.unwrap().into_bytes().await.unwrap();
        assert_eq!(&body[..], b"two");
    }

    #[tokio::test]
    async fn test_presigned_url_encodes_key_segments() {
        let provider = MemoryProvider::new();
        let url = provider.presigned_get_url("b", "dir/my file.txt").await.unwrap();

        assert!(url.starts_with("http://memory.local/b/dir/my%20file.txt?"));
        assert!(url.contains("X-Amz-Credential=memory%2F"));
        assert!(url.contains("X-Amz-Expires=604800"));
    }
}
