//! Long-lived MinIO client handle.

use std::sync::Arc;

use minio::s3::Client;
use minio::s3::creds::StaticProvider;
use minio::s3::types::S3Api;
use stowage_core::StorageService;
use tracing::{debug, error, info, instrument};

use crate::{Error, MinioConfig, Result, TRACING_TARGET_CLIENT, TRACING_TARGET_OPERATIONS};

/// MinIO client shared by every storage call.
///
/// Cloning is cheap; clones share the underlying SDK client.
#[derive(Clone)]
pub struct MinioClient {
    inner: Client,
    config: Arc<MinioConfig>,
}

impl MinioClient {
    /// Creates a new MinIO client from the given configuration.
    ///
    /// This does not contact the server; see [`MinioClient::test_connection`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the SDK client
    /// cannot be built.
    #[instrument(skip(config), target = TRACING_TARGET_CLIENT, fields(base_url = %config.base_url()))]
    pub fn new(config: MinioConfig) -> Result<Self> {
        info!(target: TRACING_TARGET_CLIENT, "Initializing MinIO client");

        config.validate().inspect_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Configuration validation failed");
        })?;

        let base_url = config.base_url().parse().map_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Invalid endpoint URL");
            Error::Config(format!("Invalid endpoint URL: {e}"))
        })?;

        let provider = StaticProvider::from(config.credentials());
        let inner = Client::new(base_url, Some(Box::new(provider)), None, None).map_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Failed to create MinIO client");
            Error::Config(format!("Failed to build MinIO client: {e}"))
        })?;

        info!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url(),
            secure = config.is_secure(),
            access_key = %config.credentials().access_key_masked(),
            "MinIO client initialized"
        );

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Tests the connection by listing buckets.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or rejects the credentials.
    #[instrument(skip(self), target = TRACING_TARGET_OPERATIONS)]
    pub async fn test_connection(&self) -> Result<()> {
        debug!(target: TRACING_TARGET_OPERATIONS, "Testing MinIO connection");

        let start = std::time::Instant::now();
        let result = self.inner.list_buckets().send().await;
        let elapsed = start.elapsed();

        match result {
            Ok(_) => {
                debug!(
                    target: TRACING_TARGET_OPERATIONS,
                    elapsed = ?elapsed,
                    "Connection test successful"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_OPERATIONS,
                    error = %e,
                    elapsed = ?elapsed,
                    "Connection test failed"
                );
                Err(Error::Client(e))
            }
        }
    }

    /// Returns the configuration the client was built from.
    #[inline]
    pub fn config(&self) -> &MinioConfig {
        &self.config
    }

    /// Returns the configured default bucket.
    #[inline]
    pub fn default_bucket(&self) -> &str {
        self.config.bucket()
    }

    /// Wraps the client into a [`StorageService`].
    pub fn into_service(self) -> StorageService {
        StorageService::new(self)
    }

    /// Returns a reference to the SDK client.
    #[inline]
    pub(crate) fn as_inner(&self) -> &Client {
        &self.inner
    }
}

impl std::fmt::Debug for MinioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinioClient")
            .field("base_url", &self.config.base_url())
            .field("secure", &self.config.is_secure())
            .field("bucket", &self.config.bucket())
            .field("access_key", &self.config.credentials().access_key_masked())
            .finish()
    }
}
