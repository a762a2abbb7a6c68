//! Error types for the MinIO client.

/// Error type for MinIO client setup and SDK calls.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// Configuration error.
    ///
    /// Missing credentials, a malformed endpoint or any other setting the
    /// client cannot be built from.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Underlying MinIO client error.
    #[error("MinIO client error: {0}")]
    Client(#[from] minio::s3::error::Error),
}

impl Error {
    /// Returns whether this error indicates a configuration issue.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

impl From<Error> for stowage_core::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Config(message) => stowage_core::Error::Config(message),
            Error::Client(source) => stowage_core::Error::provider("client", source),
        }
    }
}

/// Specialized [`Result`] type for MinIO client operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts_into_core() {
        let error = Error::Config("port must not be 0".into());
        assert!(error.is_config_error());

        let core: stowage_core::Error = error.into();
        assert!(matches!(core, stowage_core::Error::Config(ref m) if m == "port must not be 0"));
    }
}
