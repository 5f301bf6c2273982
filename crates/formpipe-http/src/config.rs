//! HTTP transport configuration

use serde::{Deserialize, Serialize};

/// Configuration for the reqwest-backed transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpTransportConfig {
    /// Base URL all descriptor paths are resolved against
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Chunk size for attachment upload progress reporting
    pub upload_chunk_size: usize,
}

impl HttpTransportConfig {
    /// Create configuration for a base URL with defaults
    #[inline]
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
            upload_chunk_size: 64 * 1024,
        }
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// With upload chunk size
    #[inline]
    #[must_use]
    pub fn with_upload_chunk_size(mut self, bytes: usize) -> Self {
        self.upload_chunk_size = bytes;
        self
    }
}
