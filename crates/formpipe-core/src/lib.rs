//! formpipe-core - Request-lifecycle outcome pipeline
//!
//! The core that turns a raw asynchronous HTTP exchange into one of a small
//! number of classified outcomes:
//! - Decodes wire envelopes into a tagged union (success / validation)
//! - Guards response integrity ahead of classification
//! - Tracks upload progress and in-flight state
//! - Reconciles form state against the last saved record
//!
//! # Example
//!
//! ```rust,ignore
//! use formpipe_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(transport: impl Transport) {
//! let notifier = Arc::new(TracingNotifier);
//! let config = LifecycleConfig::default();
//! let transport = Intercepted::new(transport, notifier.clone(), config.clone());
//! let mut pipeline = RequestPipeline::new(notifier, config);
//!
//! let descriptor = RequestDescriptor::new(Method::Get, "/users/1");
//! let outcome = pipeline
//!     .execute(&transport, descriptor, &mut |o| println!("{o:?}"))
//!     .await;
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod envelope;
pub mod error;
pub mod interceptor;
pub mod notify;
pub mod pipeline;
pub mod progress;
pub mod reconciler;
pub mod taxonomy;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use envelope::{SuccessEnvelope, ValidationEnvelope};
pub use error::TransportError;
pub use interceptor::Intercepted;
pub use notify::{Notifier, TracingNotifier};
pub use pipeline::RequestPipeline;
pub use progress::{percent, PreviewHandle, PreviewSlot};
pub use reconciler::{
    is_pristine, is_reset_disabled, is_save_disabled, restore_form, set_errors, update_form,
    FormState,
};
pub use taxonomy::{FieldErrorMap, MessageCatalog};
pub use transport::{RawError, RawEvent, RawResponse, Transport};
pub use types::{
    Attachment, FieldError, InFlightState, LifecycleConfig, Method, Outcome, Record,
    RequestDescriptor, RequestId, TransportFailureKind,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the request lifecycle
    pub use crate::{
        is_pristine, is_reset_disabled, is_save_disabled, restore_form, set_errors, update_form,
        FieldErrorMap, FormState, Intercepted, LifecycleConfig, MessageCatalog, Method, Notifier,
        Outcome, Record, RequestDescriptor, RequestPipeline, TracingNotifier, Transport,
        TransportFailureKind, ValidationEnvelope,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
