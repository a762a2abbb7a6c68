//! Storage service with bucket existence guards and observability.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use reqwest::Client;

use crate::source::{self, SourcedContent};
use crate::types::{BucketInfo, ObjectContent, ObjectDownload, ObjectInfo, UploadResult, UploadedFile};
use crate::{Error, Result, StorageProvider, TRACING_TARGET_BUCKETS, TRACING_TARGET_OBJECTS};

/// Bucket and object operations over a [`StorageProvider`].
///
/// Every bucket-scoped operation first checks that the target bucket exists,
/// and bucket creation first checks that it does not. The check and the
/// remote call are two separate round-trips, so a concurrent caller may still
/// change the bucket in between; the remote service decides the outcome then.
///
/// The provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct StorageService {
    inner: Arc<dyn StorageProvider>,
    http: Client,
}

impl fmt::Debug for StorageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageService").finish_non_exhaustive()
    }
}

impl StorageService {
    /// Creates a new storage service over the given provider.
    pub fn new<P>(provider: P) -> Self
    where
        P: StorageProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
            http: Client::default(),
        }
    }

    /// Replaces the HTTP client used to fetch network sources.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Verifies that the underlying provider is reachable.
    pub async fn health_check(&self) -> Result<()> {
        self.inner.health_check().await
    }

    /// Checks whether a bucket exists.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_BUCKETS)]
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        let exists = self.inner.bucket_exists(bucket).await?;

        tracing::debug!(
            target: TRACING_TARGET_BUCKETS,
            bucket = %bucket,
            exists,
            "Bucket existence checked"
        );

        Ok(exists)
    }

    /// Creates a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BucketAlreadyExists`] if the bucket already exists.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_BUCKETS)]
    pub async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.ensure_bucket_absent(bucket).await?;

        let started_at = Instant::now();
        let result = self.inner.create_bucket(bucket).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(()) => tracing::info!(
                target: TRACING_TARGET_BUCKETS,
                bucket = %bucket,
                elapsed_ms = elapsed.as_millis(),
                "Bucket created"
            ),
            Err(error) => tracing::error!(
                target: TRACING_TARGET_BUCKETS,
                bucket = %bucket,
                error = %error,
                elapsed_ms = elapsed.as_millis(),
                "Failed to create bucket"
            ),
        }

        result
    }

    /// Removes a bucket. The bucket must be empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BucketNotFound`] if the bucket does not exist.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_BUCKETS)]
    pub async fn remove_bucket(&self, bucket: &str) -> Result<()> {
        self.ensure_bucket_present(bucket).await?;

        let started_at = Instant::now();
        let result = self.inner.remove_bucket(bucket).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(()) => tracing::info!(
                target: TRACING_TARGET_BUCKETS,
                bucket = %bucket,
                elapsed_ms = elapsed.as_millis(),
                "Bucket removed"
            ),
            Err(error) => tracing::error!(
                target: TRACING_TARGET_BUCKETS,
                bucket = %bucket,
                error = %error,
                elapsed_ms = elapsed.as_millis(),
                "Failed to remove bucket"
            ),
        }

        result
    }

    /// Lists all buckets.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_BUCKETS)]
    pub async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let buckets = self.inner.list_buckets().await?;

        tracing::debug!(
            target: TRACING_TARGET_BUCKETS,
            count = buckets.len(),
            "Buckets listed"
        );

        Ok(buckets)
    }

    /// Uploads an object from a byte stream.
    ///
    /// When no content type is given, `application/octet-stream` is used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BucketNotFound`] if the bucket does not exist.
    #[tracing::instrument(skip(self, content), target = TRACING_TARGET_OBJECTS)]
    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        content: ObjectContent,
        content_type: Option<&str>,
    ) -> Result<UploadResult> {
        self.ensure_bucket_present(bucket).await?;

        let content_type = content_type
            .unwrap_or(crate::types::DEFAULT_CONTENT_TYPE)
            .to_owned();

        self.put(bucket, key, SourcedContent {
            content,
            content_type,
        })
        .await
    }

    /// Uploads a file received through a multipart form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BucketNotFound`] if the bucket does not exist.
    #[tracing::instrument(skip(self, file), target = TRACING_TARGET_OBJECTS, fields(file_name = ?file.file_name()))]
    pub async fn upload_object_from_multipart(
        &self,
        bucket: &str,
        key: &str,
        file: UploadedFile,
    ) -> Result<UploadResult> {
        self.ensure_bucket_present(bucket).await?;

        let content_type = file.content_type().to_owned();
        let content = file.into_content();

        self.put(bucket, key, SourcedContent {
            content,
            content_type,
        })
        .await
    }

    /// Uploads an object fetched from a network URL with an HTTP GET request.
    ///
    /// The bucket is checked before the URL is fetched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BucketNotFound`] if the bucket does not exist, and
    /// [`Error::InvalidUrl`] or [`Error::Http`] if the source cannot be fetched.
    #[tracing::instrument(skip(self, url), target = TRACING_TARGET_OBJECTS)]
    pub async fn upload_object_from_network(
        &self,
        bucket: &str,
        key: &str,
        url: &str,
    ) -> Result<UploadResult> {
        self.ensure_bucket_present(bucket).await?;

        let sourced = source::fetch_network(&self.http, url).await?;
        self.put(bucket, key, sourced).await
    }

    /// Uploads an object read from a local file.
    ///
    /// The file is read fully into memory. When no content type is given it
    /// is guessed from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BucketNotFound`] if the bucket does not exist, and
    /// [`Error::Io`] if the file cannot be read.
    #[tracing::instrument(skip(self, path), target = TRACING_TARGET_OBJECTS, fields(path = %path.as_ref().display()))]
    pub async fn upload_object_from_local(
        &self,
        bucket: &str,
        key: &str,
        path: impl AsRef<Path>,
        content_type: Option<&str>,
    ) -> Result<UploadResult> {
        self.ensure_bucket_present(bucket).await?;

        let sourced = source::read_local(path.as_ref(), content_type).await?;
        self.put(bucket, key, sourced).await
    }

    /// Removes objects from a bucket.
    ///
    /// An empty key list removes every object in the bucket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BucketNotFound`] if the bucket does not exist, and
    /// [`Error::RemoveObjects`] if the remote service refuses to remove any
    /// of the objects.
    #[tracing::instrument(skip(self, keys), target = TRACING_TARGET_OBJECTS)]
    pub async fn remove_objects<I, S>(&self, bucket: &str, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_bucket_present(bucket).await?;

        let mut keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            keys = self
                .inner
                .list_objects(bucket)
                .await?
                .into_iter()
                .map(|object| object.key)
                .collect();

            tracing::debug!(
                target: TRACING_TARGET_OBJECTS,
                bucket = %bucket,
                count = keys.len(),
                "Removing every object in bucket"
            );
        }

        if keys.is_empty() {
            tracing::debug!(
                target: TRACING_TARGET_OBJECTS,
                bucket = %bucket,
                "Bucket is already empty"
            );
            return Ok(());
        }

        let count = keys.len();
        let started_at = Instant::now();
        let failures = self.inner.remove_objects(bucket, keys).await?;
        let elapsed = started_at.elapsed();

        if !failures.is_empty() {
            tracing::error!(
                target: TRACING_TARGET_OBJECTS,
                bucket = %bucket,
                requested = count,
                failed = failures.len(),
                first_failure = %failures[0],
                elapsed_ms = elapsed.as_millis(),
                "Failed to remove objects"
            );

            return Err(Error::RemoveObjects {
                bucket: bucket.to_owned(),
                failures,
            });
        }

        tracing::info!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            count,
            elapsed_ms = elapsed.as_millis(),
            "Objects removed"
        );

        Ok(())
    }

    /// Removes every object in a bucket.
    ///
    /// # Errors
    ///
    /// See [`StorageService::remove_objects`].
    pub async fn remove_all_objects(&self, bucket: &str) -> Result<()> {
        self.remove_objects(bucket, std::iter::empty::<String>())
            .await
    }

    /// Lists every object in a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BucketNotFound`] if the bucket does not exist.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_OBJECTS)]
    pub async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        self.ensure_bucket_present(bucket).await?;

        let objects = self.inner.list_objects(bucket).await?;

        tracing::debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            count = objects.len(),
            "Objects listed"
        );

        Ok(objects)
    }

    /// Opens an object for reading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BucketNotFound`] if the bucket does not exist. A
    /// missing key is reported by the provider.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_OBJECTS)]
    pub async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectDownload> {
        self.ensure_bucket_present(bucket).await?;

        let object = self.inner.get_object(bucket, key).await.inspect_err(|error| {
            tracing::warn!(
                target: TRACING_TARGET_OBJECTS,
                bucket = %bucket,
                key = %key,
                error = %error,
                "Failed to get object"
            );
        })?;

        tracing::debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            size = object.size(),
            "Object opened"
        );

        Ok(object)
    }

    /// Returns a presigned, percent-decoded GET URL for an object.
    ///
    /// The URL expires after the provider's default expiry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BucketNotFound`] if the bucket does not exist.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_OBJECTS)]
    pub async fn get_object_url(&self, bucket: &str, key: &str) -> Result<String> {
        self.ensure_bucket_present(bucket).await?;

        let url = self.inner.presigned_get_url(bucket, key).await?;
        let url = urlencoding::decode(&url)
            .map_err(|e| Error::InvalidUrl(format!("presigned URL is not valid UTF-8: {e}")))?
            .into_owned();

        tracing::debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            "Presigned URL issued"
        );

        Ok(url)
    }

    /// Stores sourced content. The bucket must already have been checked.
    async fn put(&self, bucket: &str, key: &str, sourced: SourcedContent) -> Result<UploadResult> {
        let SourcedContent {
            content,
            content_type,
        } = sourced;
        let size = content.size();

        tracing::debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            size = ?size,
            content_type = %content_type,
            "Uploading object"
        );

        let started_at = Instant::now();
        let result = self
            .inner
            .put_object(bucket, key, content, &content_type)
            .await;
        let elapsed = started_at.elapsed();

        match result {
            Ok(etag) => {
                tracing::info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    size = ?size,
                    etag = ?etag,
                    elapsed_ms = elapsed.as_millis(),
                    "Object uploaded"
                );

                Ok(UploadResult {
                    bucket: bucket.to_owned(),
                    key: key.to_owned(),
                    size,
                    content_type,
                    etag,
                    duration: elapsed,
                })
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Failed to upload object"
                );
                Err(error)
            }
        }
    }

    /// Fails with [`Error::BucketNotFound`] unless the bucket exists.
    async fn ensure_bucket_present(&self, bucket: &str) -> Result<()> {
        if self.inner.bucket_exists(bucket).await? {
            return Ok(());
        }

        tracing::warn!(target: TRACING_TARGET_BUCKETS, bucket = %bucket, "Bucket does not exist");
        Err(Error::bucket_not_found(bucket))
    }

    /// Fails with [`Error::BucketAlreadyExists`] if the bucket exists.
    async fn ensure_bucket_absent(&self, bucket: &str) -> Result<()> {
        if !self.inner.bucket_exists(bucket).await? {
            return Ok(());
        }

        tracing::warn!(target: TRACING_TARGET_BUCKETS, bucket = %bucket, "Bucket already exists");
        Err(Error::bucket_already_exists(bucket))
    }
}
