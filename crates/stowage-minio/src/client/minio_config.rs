//! MinIO connection configuration.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use super::minio_credentials::MinioCredentials;
use crate::{Error, Result};

// Default values
const DEFAULT_ENDPOINT: &str = "localhost";
const DEFAULT_PORT: u16 = 9000;
const DEFAULT_SECURE: bool = true;
const DEFAULT_BUCKET: &str = "default";

/// Connection settings for a MinIO server.
///
/// Read once at startup and passed to [`MinioClient::new`]. The secret key
/// and session token are never serialized.
///
/// [`MinioClient::new`]: crate::MinioClient::new
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[serde(default)]
pub struct MinioConfig {
    /// MinIO server host, without scheme or port
    #[cfg_attr(
        feature = "config",
        arg(long = "minio-endpoint", env = "MINIO_ENDPOINT", default_value = DEFAULT_ENDPOINT)
    )]
    pub minio_endpoint: String,

    /// MinIO server port
    #[cfg_attr(
        feature = "config",
        arg(long = "minio-port", env = "MINIO_PORT", default_value_t = DEFAULT_PORT)
    )]
    pub minio_port: u16,

    /// Access key
    #[cfg_attr(
        feature = "config",
        arg(long = "minio-access-key", env = "MINIO_ACCESS_KEY")
    )]
    pub minio_access_key: String,

    /// Secret key
    #[cfg_attr(
        feature = "config",
        arg(long = "minio-secret-key", env = "MINIO_SECRET_KEY", hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub minio_secret_key: String,

    /// Session token for temporary credentials
    #[cfg_attr(
        feature = "config",
        arg(long = "minio-session-token", env = "MINIO_SESSION_TOKEN", hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub minio_session_token: Option<String>,

    /// Connect over HTTPS
    #[cfg_attr(
        feature = "config",
        arg(
            long = "minio-secure",
            env = "MINIO_SECURE",
            default_value_t = DEFAULT_SECURE,
            action = clap::ArgAction::Set
        )
    )]
    pub minio_secure: bool,

    /// Bucket used when a command does not name one
    #[cfg_attr(
        feature = "config",
        arg(long = "minio-bucket", env = "MINIO_BUCKET", default_value = DEFAULT_BUCKET)
    )]
    pub minio_bucket: String,
}

impl MinioConfig {
    /// Creates a configuration for `localhost:9000` over HTTPS with the given credentials.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            minio_access_key: access_key.into(),
            minio_secret_key: secret_key.into(),
            ..Self::default()
        }
    }

    /// Sets the server host.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.minio_endpoint = endpoint.into();
        self
    }

    /// Sets the server port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.minio_port = port;
        self
    }

    /// Sets whether to connect over HTTPS.
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.minio_secure = secure;
        self
    }

    /// Sets the default bucket.
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.minio_bucket = bucket.into();
        self
    }

    /// Sets a session token for temporary credentials.
    #[must_use]
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.minio_session_token = Some(session_token.into());
        self
    }

    /// Returns the default bucket.
    #[inline]
    pub fn bucket(&self) -> &str {
        &self.minio_bucket
    }

    /// Returns whether HTTPS is used.
    #[inline]
    pub fn is_secure(&self) -> bool {
        self.minio_secure
    }

    /// Returns the base URL, e.g. `https://localhost:9000`.
    pub fn base_url(&self) -> String {
        let scheme = if self.minio_secure { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.minio_endpoint, self.minio_port)
    }

    /// Returns the credentials.
    pub fn credentials(&self) -> MinioCredentials {
        let credentials = MinioCredentials::new(&self.minio_access_key, &self.minio_secret_key);
        match &self.minio_session_token {
            Some(token) => credentials.with_session_token(token),
            None => credentials,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the host is empty or carries a scheme, the
    /// port is zero, or either key is empty.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.minio_endpoint.trim();

        if endpoint.is_empty() {
            return Err(Error::Config("Endpoint cannot be empty".to_string()));
        }

        if endpoint.contains("://") {
            return Err(Error::Config(format!(
                "Endpoint '{endpoint}' must be a host without a scheme, use minio_secure instead"
            )));
        }

        if self.minio_port == 0 {
            return Err(Error::Config("Port cannot be 0".to_string()));
        }

        if self.minio_access_key.is_empty() {
            return Err(Error::Config("Access key cannot be empty".to_string()));
        }

        if self.minio_secret_key.is_empty() {
            return Err(Error::Config("Secret key cannot be empty".to_string()));
        }

        if self.minio_bucket.is_empty() {
            return Err(Error::Config("Default bucket cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl Default for MinioConfig {
    fn default() -> Self {
        Self {
            minio_endpoint: DEFAULT_ENDPOINT.to_owned(),
            minio_port: DEFAULT_PORT,
            minio_access_key: String::new(),
            minio_secret_key: String::new(),
            minio_session_token: None,
            minio_secure: DEFAULT_SECURE,
            minio_bucket: DEFAULT_BUCKET.to_owned(),
        }
    }
}

impl std::fmt::Debug for MinioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinioConfig")
            .field("minio_endpoint", &self.minio_endpoint)
            .field("minio_port", &self.minio_port)
            .field("minio_access_key", &self.credentials().access_key_masked())
            .field("minio_secure", &self.minio_secure)
            .field("minio_bucket", &self.minio_bucket)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MinioConfig::new("access", "secret");
        assert_eq!(config.base_url(), "https://localhost:9000");
        assert_eq!(config.bucket(), "default");
        assert!(config.is_secure());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = MinioConfig::new("access", "secret")
            .with_endpoint("minio.internal")
            .with_port(9001)
            .with_secure(false)
            .with_bucket("photos")
            .with_session_token("token");

        assert_eq!(config.base_url(), "http://minio.internal:9001");
        assert_eq!(config.bucket(), "photos");
        assert_eq!(config.credentials().session_token(), Some("token"));
    }

    #[test]
    fn test_validation() {
        let valid = MinioConfig::new("access", "secret");

        let invalid = [
            valid.clone().with_endpoint(""),
            valid.clone().with_endpoint("https://minio.internal"),
            valid.clone().with_port(0),
            MinioConfig::new("", "secret"),
            MinioConfig::new("access", ""),
            valid.clone().with_bucket(""),
        ];

        for config in invalid {
            let error = config.validate().unwrap_err();
            assert!(error.is_config_error());
        }
    }

    #[test]
    fn test_secret_is_never_serialized() {
        let config = MinioConfig::new("access", "supersecret").with_session_token("tok");
        let json = serde_json::to_string(&config).unwrap();

        assert!(json.contains("\"minio_access_key\":\"access\""));
        assert!(!json.contains("supersecret"));
        assert!(!json.contains("tok\""));
        assert!(!format!("{config:?}").contains("supersecret"));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: MinioConfig =
            serde_json::from_str(r#"{"minio_access_key":"a","minio_secret_key":"s"}"#).unwrap();

        assert_eq!(config.minio_endpoint, "localhost");
        assert_eq!(config.minio_port, 9000);
        assert!(config.minio_secure);
        assert!(config.validate().is_ok());
    }
}
