use std::time::Duration;

/// Result of an upload operation.
#[derive(Debug, Clone)]
pub struct UploadResult {
    /// Bucket the object was stored in.
    pub bucket: String,
    /// Object key that was uploaded.
    pub key: String,
    /// Size of the uploaded object in bytes, when known up front.
    pub size: Option<u64>,
    /// Content type the object was stored with.
    pub content_type: String,
    /// ETag reported by the remote service.
    pub etag: Option<String>,
    /// Upload duration.
    pub duration: Duration,
}
