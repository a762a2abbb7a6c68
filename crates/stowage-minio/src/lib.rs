#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![allow(clippy::result_large_err)]

// Tracing target constants for consistent logging
pub const TRACING_TARGET_CLIENT: &str = "stowage_minio::client";
pub const TRACING_TARGET_OPERATIONS: &str = "stowage_minio::operations";

mod client;
mod error;
mod provider;

pub use crate::client::{MinioClient, MinioConfig, MinioCredentials};
pub use crate::error::{Error, Result};
