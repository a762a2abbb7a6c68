use std::io;

use futures::TryStreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::SourcedContent;
use crate::types::{DEFAULT_CONTENT_TYPE, ObjectContent};
use crate::{Error, Result, TRACING_TARGET_SOURCES};

/// Parses a network source URL, accepting only `http` and `https`.
pub fn parse_source_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("'{url}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(Error::InvalidUrl(format!(
            "unsupported scheme '{scheme}', expected 'http' or 'https'"
        ))),
    }
}

/// Opens a network source with an HTTP GET request.
///
/// The response body is streamed, not buffered. The size is taken from the
/// `Content-Length` header and the content type from `Content-Type`.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the request fails or the server
/// answers with a non-success status.
pub async fn fetch_network(client: &Client, url: &str) -> Result<SourcedContent> {
    let url = parse_source_url(url)?;

    tracing::debug!(
        target: TRACING_TARGET_SOURCES,
        host = url.host_str().unwrap_or_default(),
        "Fetching network source"
    );

    let response = client.get(url).send().await?.error_for_status()?;

    let size = response.content_length();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned());

    tracing::debug!(
        target: TRACING_TARGET_SOURCES,
        size = ?size,
        content_type = %content_type,
        "Network source opened"
    );

    let stream = response.bytes_stream().map_err(io::Error::other);

    Ok(SourcedContent {
        content: ObjectContent::from_stream(stream, size),
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves a single canned HTTP response and returns the URL to fetch.
    async fn serve_once(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = socket.read(&mut request).await;
            socket.write_all(response).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/image.jpg")
    }

    #[test]
    fn test_parse_source_url() {
        assert!(parse_source_url("https://example.com/a.jpg").is_ok());
        assert!(parse_source_url("http://example.com/a.jpg?x=1").is_ok());

        let error = parse_source_url("ftp://example.com/a.jpg").unwrap_err();
        assert!(matches!(error, Error::InvalidUrl(_)));

        let error = parse_source_url("not a url").unwrap_err();
        assert!(matches!(error, Error::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_fetch_network_reads_headers_and_body() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: 4\r\nConnection: close\r\n\r\njpeg",
        )
        .await;

        let sourced = fetch_network(&Client::new(), &url).await.unwrap();
        assert_eq!(sourced.content_type, "image/jpeg");
        assert_eq!(sourced.content.size(), Some(4));
        assert_eq!(&sourced.content.into_bytes().await.unwrap()[..], b"jpeg");
    }

    #[tokio::test]
    async fn test_fetch_network_defaults_content_type() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
        )
        .await;

        let sourced = fetch_network(&Client::new(), &url).await.unwrap();
        assert_eq!(sourced.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_fetch_network_chunked_body_has_unknown_size() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\nb\r\nhello world\r\n0\r\n\r\n",
        )
        .await;

        let sourced = fetch_network(&Client::new(), &url).await.unwrap();
        assert_eq!(sourced.content.size(), None);
        assert_eq!(sourced.content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(&sourced.content.into_bytes().await.unwrap()[..], b"hello world");
    }

    #[tokio::test]
    async fn test_fetch_network_rejects_error_status() {
        let url = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let error = fetch_network(&Client::new(), &url).await.unwrap_err();
        assert!(matches!(error, Error::Http(_)));
    }
}
