//! Storage provider trait.

use crate::Result;
use crate::types::{BucketInfo, DeleteFailure, ObjectContent, ObjectDownload, ObjectInfo};

/// Core trait for object storage backends.
///
/// Each method maps onto exactly one remote call. Implementations perform no
/// precondition checks of their own; [`StorageService`] layers the bucket
/// existence guards on top.
///
/// [`StorageService`]: crate::StorageService
#[async_trait::async_trait]
pub trait StorageProvider: Send + Sync {
    /// Checks whether a bucket exists.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    /// Creates a bucket.
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Removes an empty bucket.
    async fn remove_bucket(&self, bucket: &str) -> Result<()>;

    /// Lists all buckets visible to the configured credentials.
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>>;

    /// Stores an object, returning its ETag when the backend reports one.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: ObjectContent,
        content_type: &str,
    ) -> Result<Option<String>>;

    /// Lists every object in a bucket, without a delimiter.
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>>;

    /// Opens an object for reading.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectDownload>;

    /// Removes a batch of objects, returning the objects that were not removed.
    async fn remove_objects(&self, bucket: &str, keys: Vec<String>) -> Result<Vec<DeleteFailure>>;

    /// Issues a presigned GET URL with the backend's default expiry.
    async fn presigned_get_url(&self, bucket: &str, key: &str) -> Result<String>;

    /// Verifies that the backend is reachable.
    async fn health_check(&self) -> Result<()> {
        self.list_buckets().await.map(|_| ())
    }
}
