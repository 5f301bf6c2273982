//! formpipe-http - reqwest-backed transport for the formpipe pipeline
//!
//! Implements the core's `Transport` collaborator over HTTP:
//! - Resolves request descriptors against a configured base URL
//! - Uploads attachments as multipart bodies with chunked progress
//! - Maps connection-level failures to bare raw errors so the response
//!   integrity interceptor can classify them as network-unreachable
//!
//! # Example
//!
//! ```rust,ignore
//! use formpipe_http::{HttpTransport, HttpTransportConfig};
//!
//! # fn example() -> Result<(), formpipe_http::HttpError> {
//! let transport = HttpTransport::new(HttpTransportConfig::new("http://localhost:3000"))?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod config;
pub mod error;

pub use client::HttpTransport;
pub use config::HttpTransportConfig;
pub use error::HttpError;
