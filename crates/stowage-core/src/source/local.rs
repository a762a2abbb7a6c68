use std::path::Path;

use super::SourcedContent;
use crate::types::ObjectContent;
use crate::{Result, TRACING_TARGET_SOURCES};

/// Reads a local file fully into memory.
///
/// When no content type is given it is guessed from the file extension.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub async fn read_local(path: &Path, content_type: Option<&str>) -> Result<SourcedContent> {
    let data = tokio::fs::read(path).await?;

    let content_type = match content_type {
        Some(content_type) => content_type.to_owned(),
        None => mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string(),
    };

    tracing::debug!(
        target: TRACING_TARGET_SOURCES,
        path = %path.display(),
        size = data.len(),
        content_type = %content_type,
        "Local source read"
    );

    Ok(SourcedContent {
        content: ObjectContent::from_bytes(data),
        content_type,
    })
}
