//! Bucket descriptor.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Information about a bucket as reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInfo {
    /// Bucket name.
    pub name: String,
    /// Bucket creation date.
    pub creation_date: Option<Timestamp>,
}

impl BucketInfo {
    /// Creates a new BucketInfo.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creation_date: None,
        }
    }

    /// Sets the creation date.
    pub fn with_creation_date(mut self, creation_date: Timestamp) -> Self {
        self.creation_date = Some(creation_date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_info_without_creation_date() {
        let json = serde_json::to_string(&BucketInfo::new("photos")).unwrap();
        assert_eq!(json, r#"{"name":"photos","creation_date":null}"#);

        let parsed: BucketInfo =
            serde_json::from_str(r#"{"name":"photos","creation_date":"2024-01-02T03:04:05Z"}"#)
                .unwrap();
        assert_eq!(parsed.name, "photos");
        assert_eq!(
            parsed.creation_date,
            Some("2024-01-02T03:04:05Z".parse().unwrap())
        );
    }
}
