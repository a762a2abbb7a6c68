//! In-memory storage provider for testing.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! stowage-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use stowage_core::StorageService;
//! use stowage_core::mock::MemoryProvider;
//!
//! let provider = MemoryProvider::new();
//! let service = StorageService::new(provider.clone());
//!
//! service.create_bucket("test").await?;
//! provider.fail_removal_of("locked.jpg");
//! ```

mod memory;

pub use memory::{MemoryError, MemoryProvider};
