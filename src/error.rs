//! Error types used by the bus and by listener dispatch.
//!
//! This module defines two main error enums:
//!
//! - [`BusError`]: misuse of the API itself, surfaced immediately to the caller.
//! - [`ListenerError`]: a failure raised by a listener during `publish`; never
//!   returned to the publisher, only handed to the installed [`Report`](crate::Report).
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

/// # Errors produced by the bus API.
///
/// These represent caller-side mistakes: a malformed channel identifier, or two
/// parties disagreeing on the payload type carried by one channel key.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Channel key was empty.
    #[error("invalid channel: key must not be empty")]
    InvalidChannel,

    /// A listener was registered on a key whose live listeners expect another payload type.
    #[error("channel {channel:?} carries `{found}`, cannot register a `{expected}` listener")]
    PayloadMismatch {
        /// Channel key.
        channel: String,
        /// Payload type of the rejected registration.
        expected: &'static str,
        /// Payload type already registered under the key.
        found: &'static str,
    },
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use relaybus::BusError;
    ///
    /// assert_eq!(BusError::InvalidChannel.as_label(), "bus_invalid_channel");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::InvalidChannel => "bus_invalid_channel",
            BusError::PayloadMismatch { .. } => "bus_payload_mismatch",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BusError::InvalidChannel => "empty channel key".to_string(),
            BusError::PayloadMismatch {
                channel,
                expected,
                found,
            } => format!("channel={channel} expected={expected} found={found}"),
        }
    }
}

/// # Errors raised by listeners during dispatch.
///
/// Caught per listener inside `publish`; dispatch continues with the next listener.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// Listener panicked.
    #[error("listener panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// Fallible listener returned an error.
    #[error("listener failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },
}

impl ListenerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use relaybus::ListenerError;
    ///
    /// let err = ListenerError::Failed { error: "boom".into() };
    /// assert_eq!(err.as_label(), "listener_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Panicked { .. } => "listener_panicked",
            ListenerError::Failed { .. } => "listener_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::Panicked { message } => format!("panic: {message}"),
            ListenerError::Failed { error } => format!("error: {error}"),
        }
    }

    /// Renders a `catch_unwind` payload into a [`ListenerError::Panicked`].
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        ListenerError::Panicked { message }
    }
}
