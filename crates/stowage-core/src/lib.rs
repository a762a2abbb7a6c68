#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for bucket operations.
pub const TRACING_TARGET_BUCKETS: &str = "stowage_core::buckets";

/// Tracing target for object operations.
pub const TRACING_TARGET_OBJECTS: &str = "stowage_core::objects";

/// Tracing target for upload sources.
pub const TRACING_TARGET_SOURCES: &str = "stowage_core::sources";

mod error;
mod provider;
mod service;

pub mod source;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

// Re-export key types for convenience
pub use error::{BoxedError, Error, Result};
pub use provider::StorageProvider;
pub use service::StorageService;
