//! [`StorageProvider`] implementation backed by the MinIO SDK.

use std::io;

use bytes::Bytes;
use futures::StreamExt;
use http::Method;
use jiff::Timestamp;
use minio::s3::builders::{ObjectContent as SdkContent, ObjectToDelete};
use minio::s3::response::DeleteResult;
use minio::s3::types::{S3Api, ToStream};
use stowage_core::types::{BucketInfo, DeleteFailure, ObjectContent, ObjectDownload, ObjectInfo};
use stowage_core::{Error as CoreError, Result, StorageProvider};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::{MinioClient, TRACING_TARGET_OPERATIONS};

/// Maximum number of keys accepted by a single S3 `DeleteObjects` request.
const DELETE_BATCH_SIZE: usize = 1000;

/// Number of chunks buffered between the payload and the SDK upload.
const UPLOAD_CHANNEL_CAPACITY: usize = 4;

fn sdk_error(operation: &'static str) -> impl FnOnce(minio::s3::error::Error) -> CoreError {
    move |error| CoreError::provider(operation, error)
}

fn timestamp(seconds: i64) -> Option<Timestamp> {
    Timestamp::from_second(seconds).ok()
}

/// Converts a payload into SDK content.
///
/// The SDK requires a `Sync` stream, so chunks are forwarded through a
/// bounded channel by a spawned task.
fn into_sdk_content(content: ObjectContent) -> SdkContent {
    let (mut stream, size) = content.into_parts();
    let (tx, rx) = mpsc::channel::<io::Result<Bytes>>(UPLOAD_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        while let Some(chunk) = stream.next().await {
            let failed = chunk.is_err();
            if tx.send(chunk).await.is_err() || failed {
                break;
            }
        }
    });

    SdkContent::new_from_stream(ReceiverStream::new(rx), size)
}

#[async_trait::async_trait]
impl StorageProvider for MinioClient {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        let response = self
            .as_inner()
            .bucket_exists(bucket)
            .send()
            .await
            .map_err(sdk_error("bucket_exists"))?;
        Ok(response.exists)
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.as_inner()
            .create_bucket(bucket)
            .send()
            .await
            .map_err(sdk_error("create_bucket"))?;
        Ok(())
    }

    async fn remove_bucket(&self, bucket: &str) -> Result<()> {
        self.as_inner()
            .delete_bucket(bucket)
            .send()
            .await
            .map_err(sdk_error("remove_bucket"))?;
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let response = self
            .as_inner()
            .list_buckets()
            .send()
            .await
            .map_err(sdk_error("list_buckets"))?;

        let buckets = response
            .buckets
            .into_iter()
            .map(|bucket| {
                let info = BucketInfo::new(bucket.name);
                match timestamp(bucket.creation_date.timestamp()) {
                    Some(created_at) => info.with_creation_date(created_at),
                    None => info,
                }
            })
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
        let response = self
            .as_inner()
            .put_object_content(bucket, key, into_sdk_content(content))
            .content_type(content_type.to_owned())
            .send()
            .await
            .map_err(sdk_error("put_object"))?;

        Ok(Some(response.etag))
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        let mut pages = self
            .as_inner()
            .list_objects(bucket)
            .recursive(true)
            .to_stream()
            .await;

        let mut objects = Vec::new();
        let mut page_count = 0usize;

        while let Some(page) = pages.next().await {
            let page = page.map_err(sdk_error("list_objects"))?;
            page_count += 1;

            objects.extend(page.contents.into_iter().map(|entry| {
                let mut info = ObjectInfo::new(entry.name, entry.size.unwrap_or(0) as u64);
                if let Some(last_modified) = entry.last_modified.and_then(|dt| timestamp(dt.timestamp())) {
                    info = info.with_last_modified(last_modified);
                }
                if let Some(etag) = entry.etag {
                    info = info.with_etag(etag);
                }
                info
            }));
        }

        debug!(
            target: TRACING_TARGET_OPERATIONS,
            bucket = %bucket,
            pages = page_count,
            count = objects.len(),
            "Listed objects"
        );

        Ok(objects)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectDownload> {
        let response = self
            .as_inner()
            .get_object(bucket, key)
            .send()
            .await
            .map_err(sdk_error("get_object"))?;

        let header = |name: &str| {
            response
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };

        let content_type = header("content-type");
        let etag = header("etag").map(|etag| etag.trim_matches('"').to_owned());
        let content_length = header("content-length").and_then(|v| v.parse::<u64>().ok());

        let (body, size) = response.content.to_stream().await?;
        let size = content_length.or(size.as_u64()).unwrap_or_default();

        let mut object = ObjectDownload::new(bucket, key, size, body);
        if let Some(content_type) = content_type {
            object = object.with_content_type(content_type);
        }
        if let Some(etag) = etag {
            object = object.with_etag(etag);
        }

        Ok(object)
    }

    async fn remove_objects(&self, bucket: &str, keys: Vec<String>) -> Result<Vec<DeleteFailure>> {
        let mut failures = Vec::new();

        for batch in keys.chunks(DELETE_BATCH_SIZE) {
            let objects: Vec<ObjectToDelete> = batch
                .iter()
                .map(|key| ObjectToDelete::from(key.as_str()))
                .collect();

            let response = self
                .as_inner()
                .delete_objects::<&str, ObjectToDelete>(bucket, objects)
                .send()
                .await
                .map_err(sdk_error("remove_objects"))?;

            failures.extend(response.result.into_iter().filter_map(|result| match result {
                DeleteResult::Error(error) => Some(DeleteFailure::new(
                    error.object_name,
                    error.code,
                    error.message,
                )),
                _ => None,
            }));

            debug!(
                target: TRACING_TARGET_OPERATIONS,
                bucket = %bucket,
                batch = batch.len(),
                failures = failures.len(),
                "Delete batch sent"
            );
        }

        Ok(failures)
    }

    async fn presigned_get_url(&self, bucket: &str, key: &str) -> Result<String> {
        let response = self
            .as_inner()
            .get_presigned_object_url(bucket, key, Method::GET)
            .send()
            .await
            .map_err(sdk_error("presigned_get_url"))?;

        Ok(response.url)
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;

    #[test]
    fn test_timestamp_conversion() {
        assert_eq!(timestamp(0), Some(Timestamp::UNIX_EPOCH));
        assert!(timestamp(i64::MAX).is_none());
    }

    #[tokio::test]
    async fn test_sdk_content_keeps_chunks_and_size() {
        let chunks = vec![
            Ok(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"world")),
        ];
        let content = ObjectContent::from_stream(stream::iter(chunks), Some(11));

        let (mut body, size) = into_sdk_content(content).to_stream().await.unwrap();
        let size = size.as_u64();
        assert_eq!(size, Some(11));

        let mut data = Vec::new();
        while let Some(chunk) = body.next().await {
            data.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(data, b"hello world");
    }

    #[tokio::test]
    async fn test_sdk_content_forwards_stream_errors() {
        let chunks = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::other("connection reset")),
            Ok(Bytes::from_static(b"never sent")),
        ];
        let content = ObjectContent::from_stream(stream::iter(chunks), None);

        let (mut body, _) = into_sdk_content(content).to_stream().await.unwrap();
        assert!(body.next().await.unwrap().is_ok());
        assert!(body.next().await.unwrap().is_err());
        assert!(body.next().await.is_none());
    }
}
