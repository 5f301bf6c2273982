//! Core types for the request-lifecycle pipeline
//!
//! Defines the fundamental types shared across the crate:
//! - Request identity and descriptors
//! - The authoritative `Record`
//! - Classified `Outcome` values
//! - In-flight state and lifecycle configuration

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ulid::Ulid;

/// Unique request identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Ulid);

impl RequestId {
    /// Generate new request ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The authoritative last-known-good domain object
///
/// Immutable once received; replaced wholesale by the data carried in a
/// successful save/load, never patched field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Build a record from a JSON value; only objects qualify
    #[inline]
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Field value by name
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Whether the record defines a field
    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Iterate over all fields
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View the record as a JSON value
    #[inline]
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// One field-level validation error from the wire envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Target form field
    pub field: String,
    /// Error code (e.g. `duplicate_name`)
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    /// Create new field error
    #[inline]
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Category of a transport-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportFailureKind {
    /// Failure with no status, no headers, no byte counters
    NetworkUnreachable,
    /// Structurally invalid 200-class response
    MalformedResponse,
    /// Everything else: 5xx, unexpected shapes
    Other,
}

impl TransportFailureKind {
    /// Default recoverability for this kind
    ///
    /// Only an unreachable network is worth retrying as-is; a malformed
    /// response or an unclassified failure needs outside intervention.
    #[inline]
    #[must_use]
    pub fn recoverable(&self) -> bool {
        matches!(self, Self::NetworkUnreachable)
    }
}

/// Classified result of one request
///
/// Zero or more `Progress` values strictly precede exactly one terminal
/// variant; nothing is emitted after the terminal one.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Upload progress, 0-100
    Progress(u8),
    /// Terminal: the envelope's data field
    Success(Record),
    /// Terminal: field-level validation errors, order preserved
    ValidationFailure(Vec<FieldError>),
    /// Terminal: transport-level failure
    TransportFailure {
        /// Failure category
        kind: TransportFailureKind,
        /// Whether retrying the same request may succeed
        recoverable: bool,
    },
}

impl Outcome {
    /// Whether this outcome terminates the request
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}

/// Per-pipeline transient flags for the one outstanding request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InFlightState {
    /// Whether a request is currently outstanding
    pub in_progress: bool,
    /// Latest observed upload percent (0-100)
    pub last_upload_percent: u8,
}

impl InFlightState {
    /// Reset to the idle state; runs exactly once per request, on terminal
    /// resolution
    #[inline]
    pub fn reset(&mut self) {
        self.in_progress = false;
        self.last_upload_percent = 0;
    }
}

/// Lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Status code that triggers validation classification
    pub validation_status: u16,
    /// Generic notification for unclassified failures
    pub unexpected_error_message: String,
    /// Notification for a structurally invalid success response
    pub malformed_response_message: String,
    /// Notification for an unreachable network
    pub network_unreachable_message: String,
}

impl LifecycleConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With validation status code
    #[inline]
    #[must_use]
    pub fn with_validation_status(mut self, status: u16) -> Self {
        self.validation_status = status;
        self
    }

    /// With generic unexpected-error message
    #[inline]
    #[must_use]
    pub fn with_unexpected_error_message(mut self, message: impl Into<String>) -> Self {
        self.unexpected_error_message = message.into();
        self
    }

    /// With malformed-response message
    #[inline]
    #[must_use]
    pub fn with_malformed_response_message(mut self, message: impl Into<String>) -> Self {
        self.malformed_response_message = message.into();
        self
    }

    /// With network-unreachable message
    #[inline]
    #[must_use]
    pub fn with_network_unreachable_message(mut self, message: impl Into<String>) -> Self {
        self.network_unreachable_message = message.into();
        self
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            validation_status: 400,
            unexpected_error_message: "Something went wrong. Please try again.".to_string(),
            malformed_response_message: "The server returned an unexpected response.".to_string(),
            network_unreachable_message: "Cannot reach the server. Check your connection."
                .to_string(),
        }
    }
}

/// HTTP method for a request descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Load a record
    Get,
    /// Replace a record
    Put,
    /// Create a record
    Post,
    /// Remove a record
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// File attachment carried alongside a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Form field the file belongs to
    pub field: String,
    /// Original file name
    pub file_name: String,
    /// MIME type
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Create new attachment
    #[inline]
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Description of one outbound request
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: Method,
    /// Path relative to the transport's base URL
    pub path: String,
    /// JSON body, if any
    pub body: Option<Value>,
    /// File attachment, if any
    pub attachment: Option<Attachment>,
}

impl RequestDescriptor {
    /// Create new descriptor
    #[inline]
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            attachment: None,
        }
    }

    /// With JSON body
    #[inline]
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// With file attachment
    #[inline]
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}
