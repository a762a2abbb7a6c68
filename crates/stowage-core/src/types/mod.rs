//! Types describing buckets, objects and object payloads.
//!
//! Descriptors ([`BucketInfo`], [`ObjectInfo`]) are reported by the remote
//! service and never cached locally. Payloads ([`ObjectContent`],
//! [`ObjectDownload`]) are streamed chunk by chunk.

mod bucket_info;
mod delete_failure;
mod object_content;
mod object_download;
mod object_info;
mod upload_result;
mod uploaded_file;

pub use bucket_info::BucketInfo;
pub use delete_failure::DeleteFailure;
pub use object_content::{ByteStream, ObjectContent};
pub use object_download::ObjectDownload;
pub use object_info::ObjectInfo;
pub use upload_result::UploadResult;
pub use uploaded_file::UploadedFile;

/// Content type used when neither the caller nor the source declares one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
