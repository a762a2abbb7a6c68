//! Object descriptor returned by listings.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Information about an object stored in a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Object key.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last modified timestamp.
    pub last_modified: Option<Timestamp>,
    /// ETag of the object.
    pub etag: Option<String>,
    /// Content type, when the listing reports one.
    pub content_type: Option<String>,
}

impl ObjectInfo {
    /// Creates a new ObjectInfo.
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
            etag: None,
            content_type: None,
        }
    }

    /// Sets the last modified timestamp.
    pub fn with_last_modified(mut self, last_modified: Timestamp) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Sets the ETag.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_info_json_shape() {
        let last_modified: Timestamp = "2024-01-02T03:04:05Z".parse().unwrap();
        let info = ObjectInfo::new("photos/cat.jpg", 4)
            .with_last_modified(last_modified)
            .with_etag("abc123");

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["key"], "photos/cat.jpg");
        assert_eq!(json["size"], 4);
        assert_eq!(json["last_modified"], "2024-01-02T03:04:05Z");
        assert_eq!(json["etag"], "abc123");
        assert!(json["content_type"].is_null());

        let parsed: ObjectInfo = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, info);
    }
}
