//! Transport collaborator interface
//!
//! The only way the core obtains data. A transport turns a
//! [`RequestDescriptor`] into a channel of raw events: zero or more upload
//! progress events, then exactly one terminal event (a 2xx response body or
//! a raw error). Non-2xx responses arrive as raw errors carrying their
//! status and body, so the pipeline sees a single success shape.

use crate::error::TransportError;
use crate::types::{RequestDescriptor, TransportFailureKind};
use serde_json::Value;
use tokio::sync::mpsc;

/// Raw event delivered by a transport for one request
#[derive(Debug, Clone)]
pub enum RawEvent {
    /// Upload progress counters; `total` is absent when the exchange does
    /// not know the final size
    UploadProgress {
        /// Bytes sent so far
        loaded: u64,
        /// Total bytes, if known
        total: Option<u64>,
    },
    /// Terminal: a 200-class response
    Response(RawResponse),
    /// Terminal: any failure
    Failed(RawError),
}

/// A 200-class response as delivered by the wire
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded JSON body (`Null` when the body was not valid JSON)
    pub body: Value,
}

impl RawResponse {
    /// Create new raw response
    #[inline]
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// A raw transport failure, before classification
#[derive(Debug, Clone, Default)]
pub struct RawError {
    /// HTTP status, if a response was received
    pub status: Option<u16>,
    /// Whether any response headers were received
    pub has_headers: bool,
    /// Whether the exchange reported success
    pub ok: bool,
    /// Upload byte counter, if the exchange progressed that far
    pub loaded: Option<u64>,
    /// Total upload bytes, if known
    pub total: Option<u64>,
    /// Decoded JSON body, if a response was received
    pub body: Option<Value>,
    /// Diagnostic message from the transport
    pub message: String,
    /// Classification synthesized upstream (by the integrity interceptor)
    pub kind: Option<TransportFailureKind>,
    /// Whether retrying may succeed; meaningful only when `kind` is set
    pub recoverable: bool,
    /// Whether the user was already notified about this failure
    pub notified: bool,
}

impl RawError {
    /// Failure that received a response: status and headers present
    #[inline]
    #[must_use]
    pub fn from_status(status: u16, body: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            has_headers: true,
            body,
            message: message.into(),
            ..Self::default()
        }
    }

    /// Failure with no response at all: no status, no headers, no counters
    #[inline]
    #[must_use]
    pub fn unreached(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Failure synthesized by an upstream guard, already classified and
    /// already notified
    #[inline]
    #[must_use]
    pub fn synthesized(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: Some(kind),
            recoverable: kind.recoverable(),
            notified: true,
            ..Self::default()
        }
    }

    /// Network-unreachable predicate: no headers, not ok, no status code,
    /// no upload/download byte counters
    #[inline]
    #[must_use]
    pub fn is_network_unreachable(&self) -> bool {
        !self.ok
            && !self.has_headers
            && self.status.is_none()
            && self.loaded.is_none()
            && self.total.is_none()
    }
}

/// The `issueRequest` collaborator
///
/// Implementations may emit zero or more [`RawEvent::UploadProgress`]
/// events, then exactly one terminal event, then close the channel.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Start one exchange and return its event stream
    ///
    /// # Errors
    /// - [`TransportError::InvalidDescriptor`] when the descriptor cannot
    ///   be turned into a wire request
    /// - [`TransportError::Issue`] when the exchange cannot be started
    async fn issue(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<mpsc::Receiver<RawEvent>, TransportError>;
}
