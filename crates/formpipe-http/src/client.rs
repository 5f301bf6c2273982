//! reqwest-backed transport
//!
//! Implements the `issueRequest` collaborator over a real HTTP client:
//! - JSON bodies for plain saves, multipart for attachment saves
//! - upload progress synthesized from a chunked body stream
//! - connection-level failures mapped to a bare raw error (no status, no
//!   headers, no counters) so the integrity interceptor classifies them
//!   as network-unreachable

use crate::config::HttpTransportConfig;
use crate::error::HttpError;
use bytes::Bytes;
use formpipe_core::{
    Attachment, Method, RawError, RawEvent, RawResponse, RequestDescriptor, Transport,
    TransportError,
};
use futures::Stream;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;

/// HTTP transport for the request-lifecycle pipeline
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: HttpTransportConfig,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport from configuration
    ///
    /// # Errors
    /// - [`HttpError::InvalidBaseUrl`] when the base URL does not parse
    /// - [`HttpError::Client`] when the underlying client cannot be built
    pub fn new(config: HttpTransportConfig) -> Result<Self, HttpError> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| HttpError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// The transport configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
        progress: mpsc::Sender<RawEvent>,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = join_url(&self.config.base_url, &descriptor.path);
        let mut builder = self.client.request(wire_method(descriptor.method), url);

        if let Some(attachment) = &descriptor.attachment {
            let mut form = reqwest::multipart::Form::new();
            if let Some(Value::Object(fields)) = &descriptor.body {
                for (key, value) in fields {
                    let text = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    form = form.text(key.clone(), text);
                }
            }
            let part = attachment_part(attachment, self.config.upload_chunk_size, progress)
                .map_err(|e| TransportError::InvalidDescriptor(e.to_string()))?;
            form = form.part(attachment.field.clone(), part);
            builder = builder.multipart(form);
        } else if let Some(body) = &descriptor.body {
            builder = builder.json(body);
        }

        Ok(builder)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn issue(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<mpsc::Receiver<RawEvent>, TransportError> {
        let (tx, rx) = mpsc::channel(16);
        let request = self.build_request(&descriptor, tx.clone())?;
        tracing::debug!(method = %descriptor.method, path = %descriptor.path, "issuing request");
        tokio::spawn(run_exchange(request, tx));
        Ok(rx)
    }
}

/// Send the request and deliver the terminal raw event
async fn run_exchange(request: reqwest::RequestBuilder, tx: mpsc::Sender<RawEvent>) {
    let event = match request.send().await {
        Ok(response) => {
            let status = response.status();
            // A body that is not valid JSON decodes to Null; for 2xx the
            // interceptor's envelope check then flags it as malformed.
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            if status.is_success() {
                RawEvent::Response(RawResponse::new(status.as_u16(), body))
            } else {
                RawEvent::Failed(RawError::from_status(
                    status.as_u16(),
                    Some(body),
                    format!("server returned {status}"),
                ))
            }
        }
        Err(error) => {
            tracing::debug!(%error, "exchange failed before a response arrived");
            RawEvent::Failed(match error.status() {
                Some(status) => RawError::from_status(status.as_u16(), None, error.to_string()),
                None => RawError::unreached(error.to_string()),
            })
        }
    };
    let _ = tx.send(event).await;
}

/// Multipart file part whose body stream reports chunked upload progress
fn attachment_part(
    attachment: &Attachment,
    chunk_size: usize,
    progress: mpsc::Sender<RawEvent>,
) -> reqwest::Result<reqwest::multipart::Part> {
    let bytes = Bytes::from(attachment.bytes.clone());
    let total = bytes.len() as u64;
    let stream = chunk_stream(bytes, chunk_size.max(1), progress);
    reqwest::multipart::Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
        .file_name(attachment.file_name.clone())
        .mime_str(&attachment.content_type)
}

/// Split `bytes` into chunks, emitting a progress event as each chunk is
/// handed to the wire
fn chunk_stream(
    bytes: Bytes,
    chunk_size: usize,
    progress: mpsc::Sender<RawEvent>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> {
    let total = bytes.len() as u64;
    futures::stream::unfold(
        (0usize, bytes, progress),
        move |(offset, bytes, progress)| async move {
            if offset >= bytes.len() {
                return None;
            }
            let end = offset.saturating_add(chunk_size).min(bytes.len());
            let chunk = bytes.slice(offset..end);
            let _ = progress
                .send(RawEvent::UploadProgress {
                    loaded: end as u64,
                    total: Some(total),
                })
                .await;
            Some((Ok(chunk), (end, bytes, progress)))
        },
    )
}

fn wire_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Put => reqwest::Method::PUT,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn url_joining_normalizes_slashes() {
        assert_eq!(
            join_url("http://localhost:3000/", "/users/1"),
            "http://localhost:3000/users/1"
        );
        assert_eq!(
            join_url("http://localhost:3000", "users/1"),
            "http://localhost:3000/users/1"
        );
    }

    #[test]
    fn method_mapping() {
        assert_eq!(wire_method(Method::Get), reqwest::Method::GET);
        assert_eq!(wire_method(Method::Put), reqwest::Method::PUT);
        assert_eq!(wire_method(Method::Post), reqwest::Method::POST);
        assert_eq!(wire_method(Method::Delete), reqwest::Method::DELETE);
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = HttpTransport::new(HttpTransportConfig::new("not a url"));
        assert!(matches!(result, Err(HttpError::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn chunk_stream_reports_monotone_progress() {
        let (tx, mut rx) = mpsc::channel(16);
        let bytes = Bytes::from(vec![0u8; 10]);
        let chunks: Vec<_> = chunk_stream(bytes, 4, tx).collect().await;

        assert_eq!(chunks.len(), 3);
        let sizes: Vec<usize> = chunks.iter().map(|c| c.as_ref().unwrap().len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);

        let mut loaded = Vec::new();
        while let Ok(event) = rx.try_recv() {
            match event {
                RawEvent::UploadProgress {
                    loaded: l,
                    total: Some(10),
                } => loaded.push(l),
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert_eq!(loaded, vec![4, 8, 10]);
    }

    #[tokio::test]
    async fn empty_attachment_yields_no_chunks() {
        let (tx, mut rx) = mpsc::channel(16);
        let chunks: Vec<_> = chunk_stream(Bytes::new(), 4, tx).collect().await;
        assert!(chunks.is_empty());
        assert!(rx.try_recv().is_err());
    }
}
