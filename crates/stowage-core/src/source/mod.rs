//! Upload sources.
//!
//! Each source resolves into an [`ObjectContent`] plus the content type the
//! object should be stored with:
//!
//! - [`fetch_network`]: streams the body of an HTTP GET response.
//! - [`read_local`]: reads a local file fully into memory.
//!
//! Multipart uploads are covered by [`UploadedFile`](crate::types::UploadedFile).

mod local;
mod network;

pub use local::read_local;
pub use network::{fetch_network, parse_source_url};

use crate::types::ObjectContent;

/// Content resolved from an upload source.
#[derive(Debug)]
pub struct SourcedContent {
    /// The payload to upload.
    pub content: ObjectContent,
    /// The content type reported by, or guessed for, the source.
    pub content_type: String,
}
