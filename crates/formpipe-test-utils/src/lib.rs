//! Testing utilities for the formpipe workspace
//!
//! Shared test helpers: scripted transports, a recording notifier, and
//! wire-envelope builders.

#![allow(missing_docs)]

use formpipe_core::{
    FieldError, RawError, RawEvent, Record, RequestDescriptor, Transport, TransportError,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Transport that replays pre-scripted event streams, one per `issue` call
#[derive(Debug)]
pub struct ScriptedTransport {
    scripts: Mutex<VecDeque<Vec<RawEvent>>>,
    refusal: Option<String>,
    issued: Mutex<Vec<RequestDescriptor>>,
}

impl ScriptedTransport {
    /// Transport answering exactly one request with the given events
    pub fn single(events: Vec<RawEvent>) -> Self {
        Self::sequence(vec![events])
    }

    /// Transport answering successive requests with successive scripts
    pub fn sequence(scripts: Vec<Vec<RawEvent>>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            refusal: None,
            issued: Mutex::new(Vec::new()),
        }
    }

    /// Transport whose `issue` always fails
    pub fn refusing(reason: impl Into<String>) -> Self {
        Self {
            scripts: Mutex::new(VecDeque::new()),
            refusal: Some(reason.into()),
            issued: Mutex::new(Vec::new()),
        }
    }

    /// Descriptors seen so far, in order
    pub fn issued(&self) -> Vec<RequestDescriptor> {
        self.issued.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn issue(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<mpsc::Receiver<RawEvent>, TransportError> {
        self.issued.lock().unwrap().push(descriptor);
        if let Some(reason) = &self.refusal {
            return Err(TransportError::Issue(reason.clone()));
        }
        let events = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            for event in events {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        Ok(rx)
    }
}

/// Notifier recording every message it is asked to show
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages shown so far, in order
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl formpipe_core::Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Build a success envelope body around a payload
pub fn ok_envelope(data: Value) -> Value {
    json!({"status": "ok", "data": data})
}

/// Build a 400 raw error carrying a validation envelope
pub fn validation_error(entries: Vec<(&str, &str, &str)>) -> RawError {
    let errors: Vec<Value> = entries
        .iter()
        .map(|(field, code, message)| {
            json!({"field": field, "code": code, "message": message})
        })
        .collect();
    RawError::from_status(
        400,
        Some(json!({"message": "Validation failed", "errors": errors})),
        "bad request",
    )
}

/// Build a record fixture from field errors
pub fn field_errors(entries: Vec<(&str, &str, &str)>) -> Vec<FieldError> {
    entries
        .into_iter()
        .map(|(field, code, message)| FieldError::new(field, code, message))
        .collect()
}

/// A small user-profile record fixture
pub fn sample_record() -> Record {
    Record::from_value(json!({
        "id": 1,
        "name": "ada",
        "email": "ada@example.org",
    }))
    .unwrap()
}
