//! MinIO authentication credentials.

use std::fmt;

use minio::s3::creds::StaticProvider;

/// Access key, secret key and optional session token.
///
/// `Debug` masks the access key and never prints the secret.
#[derive(Clone)]
pub struct MinioCredentials {
    access_key: String,
    secret_key: String,
    session_token: Option<String>,
}

impl MinioCredentials {
    /// Creates credentials from an access key and a secret key.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    /// Sets a session token for temporary credentials.
    #[must_use]
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(session_token.into());
        self
    }

    /// Returns the access key.
    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Returns the secret key.
    #[inline]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Returns the session token if available.
    #[inline]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Returns the access key with everything past the first four characters masked.
    pub fn access_key_masked(&self) -> String {
        match self.access_key.char_indices().nth(4) {
            Some((end, _)) => format!("{}***", &self.access_key[..end]),
            None => "*".repeat(self.access_key.chars().count()),
        }
    }
}

impl fmt::Debug for MinioCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinioCredentials")
            .field("access_key", &self.access_key_masked())
            .field("has_session_token", &self.session_token.is_some())
            .finish_non_exhaustive()
    }
}

impl From<MinioCredentials> for StaticProvider {
    fn from(credentials: MinioCredentials) -> Self {
        StaticProvider::new(
            &credentials.access_key,
            &credentials.secret_key,
            credentials.session_token.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_with_session_token() {
        let creds = MinioCredentials::new("access", "secret").with_session_token("token");
        assert_eq!(creds.access_key(), "access");
        assert_eq!(creds.secret_key(), "secret");
        assert_eq!(creds.session_token(), Some("token"));
    }

    #[test]
    fn test_credentials_masking() {
        let creds = MinioCredentials::new("AKIATEST12345", "secret");
        assert_eq!(creds.access_key_masked(), "AKIA***");

        let short_creds = MinioCredentials::new("ABC", "secret");
        assert_eq!(short_creds.access_key_masked(), "***");
    }

    #[test]
    fn test_debug_hides_secret() {
        let creds = MinioCredentials::new("minioadmin", "supersecret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("mini***"));
        assert!(!debug.contains("supersecret"));
        assert!(!debug.contains("minioadmin"));
    }
}
