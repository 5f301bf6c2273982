//! Response integrity interceptor
//!
//! A decorator wrapping every outbound exchange. It guarantees two
//! properties before classification happens downstream:
//! - a response nominally reporting success matches the envelope shape
//!   `{"status": "ok", "data": <defined>}`; a 200-class body that does not
//!   is converted into a malformed-response failure, never swallowed;
//! - a failure with no status code, no headers, and no byte counters is
//!   classified as network-unreachable before anything else sees it.
//!
//! Both synthesized failures are marked already-notified so downstream
//! stages do not notify the user twice. At most one notification leaves
//! this layer per request.

use crate::envelope::SuccessEnvelope;
use crate::error::TransportError;
use crate::notify::Notifier;
use crate::transport::{RawError, RawEvent, RawResponse, Transport};
use crate::types::{LifecycleConfig, RequestDescriptor, TransportFailureKind};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Transport decorator enforcing response integrity
pub struct Intercepted<T> {
    inner: T,
    notifier: Arc<dyn Notifier>,
    config: LifecycleConfig,
}

impl<T> Intercepted<T> {
    /// Wrap a transport
    #[inline]
    pub fn new(inner: T, notifier: Arc<dyn Notifier>, config: LifecycleConfig) -> Self {
        Self {
            inner,
            notifier,
            config,
        }
    }

    /// The wrapped transport
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Intercepted<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intercepted")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl<T: Transport> Transport for Intercepted<T> {
    async fn issue(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<mpsc::Receiver<RawEvent>, TransportError> {
        let upstream = self.inner.issue(descriptor).await?;
        let (tx, rx) = mpsc::channel(16);
        let notifier = Arc::clone(&self.notifier);
        let config = self.config.clone();
        tokio::spawn(relay(upstream, tx, notifier, config));
        Ok(rx)
    }
}

/// Per-request relay: screens each event, then forwards it
async fn relay(
    mut upstream: mpsc::Receiver<RawEvent>,
    tx: mpsc::Sender<RawEvent>,
    notifier: Arc<dyn Notifier>,
    config: LifecycleConfig,
) {
    let mut notified = false;
    while let Some(event) = upstream.recv().await {
        let event = match event {
            RawEvent::Response(response) => {
                screen_response(response, notifier.as_ref(), &config, &mut notified)
            }
            RawEvent::Failed(error) => {
                screen_failure(error, notifier.as_ref(), &config, &mut notified)
            }
            progress @ RawEvent::UploadProgress { .. } => progress,
        };
        if tx.send(event).await.is_err() {
            // Downstream dropped its receiver; nothing left to guard.
            break;
        }
    }
}

fn screen_response(
    response: RawResponse,
    notifier: &dyn Notifier,
    config: &LifecycleConfig,
    notified: &mut bool,
) -> RawEvent {
    if SuccessEnvelope::matches(&response.body) {
        return RawEvent::Response(response);
    }
    tracing::error!(
        status = response.status,
        "success response failed the envelope shape check"
    );
    if !*notified {
        notifier.notify(&config.malformed_response_message);
        *notified = true;
    }
    RawEvent::Failed(RawError::synthesized(
        TransportFailureKind::MalformedResponse,
        format!("malformed success envelope (status {})", response.status),
    ))
}

fn screen_failure(
    mut error: RawError,
    notifier: &dyn Notifier,
    config: &LifecycleConfig,
    notified: &mut bool,
) -> RawEvent {
    if error.kind.is_none() && error.is_network_unreachable() {
        tracing::warn!(message = %error.message, "no status, headers, or byte counters; network unreachable");
        if !*notified {
            notifier.notify(&config.network_unreachable_message);
            *notified = true;
        }
        error.kind = Some(TransportFailureKind::NetworkUnreachable);
        error.recoverable = true;
        error.notified = true;
    }
    RawEvent::Failed(error)
}
