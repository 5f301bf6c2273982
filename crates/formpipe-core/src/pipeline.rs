//! Request lifecycle pipeline
//!
//! Drives a single request end-to-end: marks it in-flight, relays upload
//! progress, classifies the terminal event into exactly one
//! [`Outcome`], and resets the in-flight flags exactly once on terminal
//! resolution, no matter which branch resolved the request.

use crate::envelope::{SuccessEnvelope, ValidationEnvelope};
use crate::notify::Notifier;
use crate::progress;
use crate::transport::{RawError, RawEvent, RawResponse, Transport};
use crate::types::{
    InFlightState, LifecycleConfig, Outcome, RequestDescriptor, RequestId, TransportFailureKind,
};
use std::sync::Arc;

/// Pipeline instance owning the in-flight state of one editing session
///
/// No queuing or locking: a request issued while another is outstanding is
/// classified independently. Callers wanting serialization gate new
/// requests on [`RequestPipeline::in_progress`].
pub struct RequestPipeline {
    notifier: Arc<dyn Notifier>,
    config: LifecycleConfig,
    state: InFlightState,
}

impl RequestPipeline {
    /// Create new pipeline
    #[inline]
    pub fn new(notifier: Arc<dyn Notifier>, config: LifecycleConfig) -> Self {
        Self {
            notifier,
            config,
            state: InFlightState::default(),
        }
    }

    /// Whether a request is currently outstanding
    #[inline]
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.state.in_progress
    }

    /// Latest observed upload percent
    #[inline]
    #[must_use]
    pub fn last_upload_percent(&self) -> u8 {
        self.state.last_upload_percent
    }

    /// Snapshot of the in-flight flags
    #[inline]
    #[must_use]
    pub fn state(&self) -> InFlightState {
        self.state
    }

    /// Run one request to its terminal outcome
    ///
    /// Every emitted [`Outcome`] (progress and terminal) is delivered to
    /// `sink` in order; the terminal outcome is also returned. The
    /// in-flight flags are set synchronously before the exchange starts
    /// and reset exactly once, before the terminal outcome is delivered,
    /// so a sink observing the terminal event already sees the pipeline
    /// idle.
    pub async fn execute<T: Transport>(
        &mut self,
        transport: &T,
        descriptor: RequestDescriptor,
        sink: &mut dyn FnMut(Outcome),
    ) -> Outcome {
        let request_id = RequestId::new();
        self.state.in_progress = true;
        tracing::info!(
            %request_id,
            method = %descriptor.method,
            path = %descriptor.path,
            "request started"
        );

        let terminal = self.drive(transport, descriptor, sink).await;

        self.state.reset();
        tracing::info!(%request_id, terminal = outcome_label(&terminal), "request resolved");
        sink(terminal.clone());
        terminal
    }

    async fn drive<T: Transport>(
        &mut self,
        transport: &T,
        descriptor: RequestDescriptor,
        sink: &mut dyn FnMut(Outcome),
    ) -> Outcome {
        let mut events = match transport.issue(descriptor).await {
            Ok(events) => events,
            Err(error) => {
                tracing::warn!(%error, "transport refused the request");
                self.notifier.notify(&self.config.unexpected_error_message);
                return other_failure();
            }
        };

        while let Some(event) = events.recv().await {
            match event {
                RawEvent::UploadProgress { loaded, total } => {
                    if let Some(percent) = progress::percent(loaded, total) {
                        self.state.last_upload_percent = percent;
                        sink(Outcome::Progress(percent));
                    }
                }
                RawEvent::Response(response) => return self.classify_response(&response),
                RawEvent::Failed(error) => return self.classify_failure(error),
            }
        }

        // The stream closed without a terminal event (e.g. the exchange was
        // cancelled externally). Classify as unclassified failure so the
        // in-flight flags never stay stuck.
        tracing::warn!("event stream closed without a terminal event");
        self.notifier.notify(&self.config.unexpected_error_message);
        other_failure()
    }

    fn classify_response(&self, response: &RawResponse) -> Outcome {
        if let Some(record) = SuccessEnvelope::decode_record(&response.body) {
            tracing::debug!(fields = record.len(), "success envelope decoded");
            return Outcome::Success(record);
        }
        // The interceptor screens envelope shape; reaching this branch
        // means the payload was defined but not an object.
        tracing::warn!(status = response.status, "success payload is not a record");
        self.notifier.notify(&self.config.unexpected_error_message);
        other_failure()
    }

    fn classify_failure(&self, error: RawError) -> Outcome {
        // Failures synthesized upstream carry their classification and are
        // never validation failures.
        if let Some(kind) = error.kind {
            if !error.notified {
                self.notifier.notify(&self.config.unexpected_error_message);
            }
            return Outcome::TransportFailure {
                kind,
                recoverable: error.recoverable,
            };
        }

        // Validation takes precedence over generic classification.
        if error.status == Some(self.config.validation_status) {
            if let Some(envelope) = error.body.as_ref().and_then(ValidationEnvelope::decode) {
                tracing::debug!(count = envelope.errors.len(), "validation failure absorbed");
                return Outcome::ValidationFailure(envelope.errors);
            }
        }

        tracing::warn!(
            status = ?error.status,
            message = %error.message,
            "unclassified transport failure"
        );
        if !error.notified {
            self.notifier.notify(&self.config.unexpected_error_message);
        }
        other_failure()
    }
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[inline]
fn other_failure() -> Outcome {
    Outcome::TransportFailure {
        kind: TransportFailureKind::Other,
        recoverable: false,
    }
}

fn outcome_label(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Progress(_) => "progress",
        Outcome::Success(_) => "success",
        Outcome::ValidationFailure(_) => "validation-failure",
        Outcome::TransportFailure { .. } => "transport-failure",
    }
}
