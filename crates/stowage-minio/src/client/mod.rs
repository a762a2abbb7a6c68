//! MinIO client with configuration management.
//!
//! A single [`MinioClient`] is built from a [`MinioConfig`] at startup and
//! shared by every call; the SDK client handles connection pooling.

mod minio_client;
mod minio_config;
mod minio_credentials;

pub use minio_client::MinioClient;
pub use minio_config::MinioConfig;
pub use minio_credentials::MinioCredentials;
