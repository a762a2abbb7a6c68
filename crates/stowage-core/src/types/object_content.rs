//! Streaming object payloads.

use std::fmt;
use std::io;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt, TryStreamExt};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Boxed stream of payload chunks.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// Payload of an object being uploaded.
///
/// The payload is consumed chunk by chunk. The size is optional: sources
/// that cannot report their length up front (e.g. chunked HTTP responses)
/// leave it unset and the provider falls back to a multipart upload.
pub struct ObjectContent {
    stream: ByteStream,
    size: Option<u64>,
}

impl ObjectContent {
    /// Creates content from a stream of chunks and an optional total size.
    pub fn from_stream<S>(stream: S, size: Option<u64>) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self {
            stream: stream.boxed(),
            size,
        }
    }

    /// Creates content from an in-memory buffer.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        Self::from_stream(stream::once(async move { Ok(data) }), Some(size))
    }

    /// Creates content from an async reader.
    pub fn from_reader<R>(reader: R, size: Option<u64>) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        Self::from_stream(ReaderStream::new(reader), size)
    }

    /// Returns the total size in bytes, if known.
    #[inline]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Splits the content into its chunk stream and size.
    pub fn into_parts(self) -> (ByteStream, Option<u64>) {
        (self.stream, self.size)
    }

    /// Returns the chunk stream.
    pub fn into_stream(self) -> ByteStream {
        self.stream
    }

    /// Reads the whole payload into memory.
    pub async fn into_bytes(self) -> io::Result<Bytes> {
        collect_stream(self.stream, self.size).await
    }
}

impl From<Bytes> for ObjectContent {
    fn from(data: Bytes) -> Self {
        Self::from_bytes(data)
    }
}

impl From<Vec<u8>> for ObjectContent {
    fn from(data: Vec<u8>) -> Self {
        Self::from_bytes(data)
    }
}

impl fmt::Debug for ObjectContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectContent")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Concatenates all chunks of a stream.
pub(crate) async fn collect_stream(
    mut stream: ByteStream,
    size_hint: Option<u64>,
) -> io::Result<Bytes> {
    // Preallocation is capped at 8 MiB.
    let capacity = size_hint.unwrap_or(0).min(8 * 1024 * 1024) as usize;
    let mut buffer = BytesMut::with_capacity(capacity);

    while let Some(chunk) = stream.try_next().await? {
        buffer.extend_from_slice(&chunk);
    }

    Ok(buffer.freeze())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[tokio::test]
    async fn test_from_bytes_reports_size() {
        let content = ObjectContent::from_bytes("hello world");
        assert_eq!(content.size(), Some(11));

        let data = content.into_bytes().await.unwrap();
        assert_eq!(&data[..], b"hello world");
    }

    #[tokio::test]
    async fn test_from_stream_concatenates_chunks() {
        let chunks = vec![
            Ok(Bytes::from_static(b"abc")),
            Ok(Bytes::from_static(b"def")),
        ];
        let content = ObjectContent::from_stream(stream::iter(chunks), None);
        assert_eq!(content.size(), None);

        let data = content.into_bytes().await.unwrap();
        assert_eq!(&data[..], b"abcdef");
    }

    #[tokio::test]
    async fn test_stream_error_is_returned() {
        let chunks = vec![
            Ok(Bytes::from_static(b"abc")),
            Err(io::Error::other("broken pipe")),
        ];
        let content = ObjectContent::from_stream(stream::iter(chunks), Some(6));

        let error = content.into_bytes().await.unwrap_err();
        assert_eq!(error.to_string(), "broken pipe");
    }

    #[tokio::test]
    async fn test_into_stream_keeps_chunk_boundaries() {
        let chunks = vec![
            Ok(Bytes::from_static(b"abc")),
            Ok(Bytes::from_static(b"def")),
        ];
        let content = ObjectContent::from_stream(stream::iter(chunks), Some(6));

        let chunks: Vec<Bytes> = content.into_stream().try_collect().await.unwrap();
        assert_eq!(chunks, [Bytes::from_static(b"abc"), Bytes::from_static(b"def")]);
    }

    #[tokio::test]
    async fn test_from_reader() {
        let reader = Cursor::new(b"streamed".to_vec());
        let content = ObjectContent::from_reader(reader, Some(8));

        let data = content.into_bytes().await.unwrap();
        assert_eq!(&data[..], b"streamed");
    }
}
