//! Error types for the HTTP transport

/// Errors constructing the HTTP transport
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The configured base URL does not parse
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    /// The underlying client could not be built
    #[error("http client construction failed: {0}")]
    Client(#[from] reqwest::Error),
}
