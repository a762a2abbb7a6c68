//! Files received through a web framework's multipart upload.

use bytes::Bytes;

use super::{DEFAULT_CONTENT_TYPE, ObjectContent};

/// A file received from a multipart form submission.
///
/// Web frameworks buffer the part before handing it to a handler, so the
/// payload is held in memory and its size is always known.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl UploadedFile {
    /// Creates a new UploadedFile.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            file_name: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// Sets the original file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Sets the declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the original file name.
    #[inline]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Returns the declared content type, falling back to `application/octet-stream`.
    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Returns the payload size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Returns the payload.
    #[inline]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Converts the file into uploadable content.
    pub fn into_content(self) -> ObjectContent {
        ObjectContent::from_bytes(self.data)
    }

    /// Reads a multipart field into an uploaded file.
    #[cfg(feature = "axum")]
    #[cfg_attr(docsrs, doc(cfg(feature = "axum")))]
    pub async fn from_field(field: axum::extract::multipart::Field<'_>) -> crate::Result<Self> {
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let data = field.bytes().await.map_err(std::io::Error::other)?;

        Ok(Self {
            file_name,
            content_type,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploaded_file_defaults() {
        let file = UploadedFile::new(vec![1u8, 2, 3]);
        assert_eq!(file.size(), 3);
        assert_eq!(file.content_type(), DEFAULT_CONTENT_TYPE);
        assert!(file.file_name().is_none());
    }

    #[tokio::test]
    async fn test_uploaded_file_into_content() {
        let file = UploadedFile::new("payload")
            .with_file_name("1.jpg")
            .with_content_type("image/jpeg");
        assert_eq!(file.file_name(), Some("1.jpg"));
        assert_eq!(file.content_type(), "image/jpeg");

        let content = file.into_content();
        assert_eq!(content.size(), Some(7));
        assert_eq!(&content.into_bytes().await.unwrap()[..], b"payload");
    }

    #[cfg(feature = "axum")]
    #[tokio::test]
    async fn test_from_multipart_field() {
        use axum::body::Body;
        use axum::extract::{FromRequest, Multipart};
        use axum::http::{Request, header};

        let body = concat!(
            "--BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"file\"; filename=\"1.jpg\"\r\n",
            "Content-Type: image/jpeg\r\n",
            "\r\n",
            "jpeg-bytes\r\n",
            "--BOUNDARY--\r\n",
        );
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap();

        let mut multipart = Multipart::from_request(request, &()).await.unwrap();
        let field = multipart.next_field().await.unwrap().unwrap();
        let file = UploadedFile::from_field(field).await.unwrap();

        assert_eq!(file.file_name(), Some("1.jpg"));
        assert_eq!(file.content_type(), "image/jpeg");
        assert_eq!(&file.data()[..], b"jpeg-bytes");
    }
}
