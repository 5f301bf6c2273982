//! Error types for the pipeline core
//!
//! Covers failures that happen before any raw event stream exists; once a
//! stream is flowing, failures travel through it as raw events and end up
//! classified into an [`Outcome`](crate::types::Outcome) instead.

/// Errors issuing a request through a transport
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The exchange could not be started at all
    #[error("failed to issue request: {0}")]
    Issue(String),

    /// The descriptor cannot be turned into a wire request
    #[error("invalid request descriptor: {0}")]
    InvalidDescriptor(String),
}

impl TransportError {
    /// Whether retrying the same descriptor may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Issue(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display() {
        let err = TransportError::Issue("connection pool gone".to_string());
        assert!(err.to_string().contains("failed to issue request"));
    }

    #[test]
    fn transport_error_retryability() {
        assert!(TransportError::Issue("timeout".to_string()).is_retryable());
        assert!(!TransportError::InvalidDescriptor("no path".to_string()).is_retryable());
    }
}
