//! Request-scoped locale context.
//!
//! The binding lives in a tokio task-local, so it is visible only within
//! the dynamic extent of the future (or closure) that established it.
//! Concurrent requests interleaved on the same runtime each observe their
//! own binding.

use std::future::Future;

use crate::locale::Locale;

tokio::task_local! {
    static REQUEST_CONTEXT: RequestContext;
}

/// Locale and origin for a single inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub locale: Locale,
    pub origin: String,
}

impl RequestContext {
    pub fn new(locale: Locale, origin: impl Into<String>) -> Self {
        Self {
            locale,
            origin: origin.into(),
        }
    }

    /// Run `f` with this context bound.
    pub async fn scope<F: Future>(self, f: F) -> F::Output {
        REQUEST_CONTEXT.scope(self, f).await
    }

    /// Run a synchronous closure with this context bound.
    pub fn sync_scope<F, R>(self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        REQUEST_CONTEXT.sync_scope(self, f)
    }

    /// The context bound to the current task, if any.
    pub fn current() -> Option<RequestContext> {
        REQUEST_CONTEXT.try_with(Clone::clone).ok()
    }
}
