//! Notification collaborator interface

/// Fire-and-forget user-facing notification channel
///
/// The core calls this at most twice per request: once for a failure
/// synthesized by the integrity interceptor, once for a generic unexpected
/// error. Validation failures never reach it; those render inline.
pub trait Notifier: Send + Sync {
    /// Show one transient message to the user
    fn notify(&self, message: &str);
}

/// Notifier that only logs, for headless callers and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(target: "formpipe::notify", "{message}");
    }
}
