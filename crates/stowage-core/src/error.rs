//! Error types for bucket and object operations.

use crate::types::DeleteFailure;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Specialized [`Result`] type for storage operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for storage operations.
///
/// Only the bucket preconditions are classified. Everything reported by the
/// remote service, the network or the filesystem is carried unchanged.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// A bucket creation targeted a bucket that already exists.
    #[error("bucket '{bucket}' already exists")]
    BucketAlreadyExists {
        /// Name of the offending bucket.
        bucket: String,
    },

    /// A bucket-scoped operation targeted a bucket that does not exist.
    #[error("bucket '{bucket}' does not exist")]
    BucketNotFound {
        /// Name of the offending bucket.
        bucket: String,
    },

    /// The remote service reported per-object errors during a batch removal.
    #[error("failed to remove {} object(s) from bucket '{bucket}'", failures.len())]
    RemoveObjects {
        /// Name of the bucket the removal targeted.
        bucket: String,
        /// Objects the remote service refused to remove.
        failures: Vec<DeleteFailure>,
    },

    /// A URL could not be parsed, decoded or is not supported.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fetching a network source failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading a local source or a content stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The storage provider failed to complete an operation.
    #[error("Storage provider error during {operation}: {source}")]
    Provider {
        /// Name of the provider operation that failed.
        operation: &'static str,
        /// Underlying provider error.
        #[source]
        source: BoxedError,
    },
}

impl Error {
    /// Creates a bucket already exists error.
    pub fn bucket_already_exists(bucket: impl Into<String>) -> Self {
        Self::BucketAlreadyExists {
            bucket: bucket.into(),
        }
    }

    /// Creates a bucket not found error.
    pub fn bucket_not_found(bucket: impl Into<String>) -> Self {
        Self::BucketNotFound {
            bucket: bucket.into(),
        }
    }

    /// Wraps an error raised by a storage provider.
    pub fn provider(operation: &'static str, source: impl Into<BoxedError>) -> Self {
        Self::Provider {
            operation,
            source: source.into(),
        }
    }

    /// Returns whether this error reports an already existing bucket.
    pub fn is_bucket_already_exists(&self) -> bool {
        matches!(self, Error::BucketAlreadyExists { .. })
    }

    /// Returns whether this error reports a missing bucket.
    pub fn is_bucket_not_found(&self) -> bool {
        matches!(self, Error::BucketNotFound { .. })
    }

    /// Returns the bucket name carried by this error, if any.
    pub fn bucket(&self) -> Option<&str> {
        match self {
            Error::BucketAlreadyExists { bucket }
            | Error::BucketNotFound { bucket }
            | Error::RemoveObjects { bucket, .. } => Some(bucket),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_error_messages() {
        let error = Error::bucket_already_exists("test");
        assert_eq!(error.to_string(), "bucket 'test' already exists");
        assert!(error.is_bucket_already_exists());

        let error = Error::bucket_not_found("undefined");
        assert_eq!(error.to_string(), "bucket 'undefined' does not exist");
        assert!(error.is_bucket_not_found());
        assert_eq!(error.bucket(), Some("undefined"));
    }

    #[test]
    fn test_remove_objects_message() {
        let error = Error::RemoveObjects {
            bucket: "photos".into(),
            failures: vec![
                DeleteFailure::new("a.jpg", "AccessDenied", "Access Denied"),
                DeleteFailure::new("b.jpg", "AccessDenied", "Access Denied"),
            ],
        };

        assert_eq!(
            error.to_string(),
            "failed to remove 2 object(s) from bucket 'photos'"
        );
        assert_eq!(error.bucket(), Some("photos"));
    }

    #[test]
    fn test_provider_error_keeps_source() {
        let io = std::io::Error::other("connection reset");
        let error = Error::provider("list_buckets", io);

        assert!(error.to_string().contains("list_buckets"));
        assert!(error.to_string().contains("connection reset"));
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.bucket().is_none());
    }
}
