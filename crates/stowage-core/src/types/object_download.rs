//! Readable object returned by `get_object`.

use std::fmt;
use std::io;
use std::path::Path;

use bytes::Bytes;
use futures::TryStreamExt;
use tokio::io::AsyncWriteExt;

use super::object_content::{ByteStream, collect_stream};

/// An object fetched from a bucket: its metadata and a readable body.
///
/// The body is not read until one of the consuming methods is called.
pub struct ObjectDownload {
    bucket: String,
    key: String,
    size: u64,
    content_type: Option<String>,
    etag: Option<String>,
    body: ByteStream,
}

impl ObjectDownload {
    /// Creates a new ObjectDownload.
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        size: u64,
        body: ByteStream,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            size,
            content_type: None,
            etag: None,
            body,
        }
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the ETag.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Returns the bucket the object was read from.
    #[inline]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Returns the object key.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the object size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the content type the object was stored with.
    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the ETag.
    #[inline]
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Returns the body stream.
    pub fn into_stream(self) -> ByteStream {
        self.body
    }

    /// Reads the whole body into memory.
    pub async fn into_bytes(self) -> io::Result<Bytes> {
        collect_stream(self.body, Some(self.size)).await
    }

    /// Streams the body into a local file, returning the number of bytes written.
    ///
    /// The file is created or truncated. If the body fails partway the
    /// partial file is removed.
    pub async fn write_to_file(self, path: impl AsRef<Path>) -> io::Result<u64> {
        let path = path.as_ref();
        let mut file = tokio::fs::File::create(path).await?;

        match copy_body(self.body, &mut file).await {
            Ok(written) => Ok(written),
            Err(error) => {
                drop(file);
                let _ = tokio::fs::remove_file(path).await;
                Err(error)
            }
        }
    }
}

async fn copy_body(mut body: ByteStream, file: &mut tokio::fs::File) -> io::Result<u64> {
    let mut written = 0u64;

    while let Some(chunk) = body.try_next().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

impl fmt::Debug for ObjectDownload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDownload")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .field("size", &self.size)
            .field("content_type", &self.content_type)
            .field("etag", &self.etag)
            .finish_non_exhaustive()
    }
}
