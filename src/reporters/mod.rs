//! # Failure reporting for listener dispatch.
//!
//! `publish` never propagates listener failures to its caller. Instead every
//! caught failure is handed to the bus's [`Report`] implementation, installed
//! through [`BusBuilder::with_reporter`](crate::BusBuilder::with_reporter).
//!
//! ## Architecture
//! ```text
//! publish(channel, payload)
//!     ├──► listener 1 ──► Ok
//!     ├──► listener 2 ──► panic / Err ──► ListenerFailure ──► Report::on_failure
//!     ├──► listener 3 (owner dropped)  ──► skipped        ──► Report::on_expired
//!     └──► listener 4 ──► Ok
//! ```
//!
//! ## Built-in reporters
//! - [`LogReporter`] - structured `tracing` records (default)

mod log;
mod report;

pub use log::LogReporter;
pub use report::{ListenerFailure, Report};
