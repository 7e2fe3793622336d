//! # Reporter trait.
//!
//! Provides [`Report`] the extension point for observing listener failures
//! and expired owner-bound listeners.
//!
//! ## Rules
//! - Called synchronously on the publishing thread, after the failing listener returns.
//! - A panicking reporter is contained as well; it never escapes `publish`.
//! - Keep implementations cheap: they run inside the dispatch loop.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use relaybus::{ListenerFailure, Report};
//!
//! #[derive(Default)]
//! struct FailureCounter(AtomicUsize);
//!
//! impl Report for FailureCounter {
//!     fn on_failure(&self, _failure: &ListenerFailure) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//!
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

use crate::error::ListenerError;
use crate::listeners::{ListenerId, Priority};

/// One caught listener failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    /// Channel key the payload was published on.
    pub channel: String,
    /// Registration that failed.
    pub listener: ListenerId,
    /// Tier of the failing registration.
    pub priority: Priority,
    /// Whether the registration was one-shot (and is now removed).
    pub once: bool,
    /// What went wrong.
    pub error: ListenerError,
}

/// Observability sink for dispatch.
pub trait Report: Send + Sync + 'static {
    /// Called once per caught listener failure.
    fn on_failure(&self, failure: &ListenerFailure);

    /// Called when an owner-bound listener is skipped because its owner is gone.
    ///
    /// Not an error; the default implementation ignores it.
    fn on_expired(&self, channel: &str, listener: ListenerId) {
        let _ = (channel, listener);
    }

    /// Returns the reporter name used in the bus's own log records.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
