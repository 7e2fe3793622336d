//! # Logging reporter.
//!
//! [`LogReporter`] turns dispatch observations into `tracing` records:
//!
//! ```text
//! WARN  listener failed channel=score.changed listener=listener-3 priority=high once=false label=listener_panicked reason="panic: index out of bounds"
//! TRACE owner expired, listener skipped channel=score.changed listener=listener-5
//! ```
//!
//! Install any `tracing` subscriber (e.g. `tracing-subscriber`'s `fmt`) to see them.

use super::{ListenerFailure, Report};
use crate::listeners::ListenerId;

/// Reporter backed by `tracing`. Installed by default.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Report for LogReporter {
    fn on_failure(&self, failure: &ListenerFailure) {
        tracing::warn!(
            channel = %failure.channel,
            listener = %failure.listener,
            priority = failure.priority.as_label(),
            once = failure.once,
            label = failure.error.as_label(),
            reason = %failure.error.as_message(),
            "listener failed"
        );
    }

    fn on_expired(&self, channel: &str, listener: ListenerId) {
        tracing::trace!(channel, listener = %listener, "owner expired, listener skipped");
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
