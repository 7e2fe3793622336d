//! Bus engine: registries, dispatch and registration handles.
//!
//! The public API from this module is [`Bus`] (with [`BusBuilder`] and
//! [`Config`]), the [`Subscription`] handle and the [`global`] instance.
//!
//! Internal modules:
//! - [`registry`]: concurrent key → bucket map, copy-on-write entry lists;
//! - [`entry`]: one registration, invocation with panic isolation;
//! - [`bus`]: registration API and the dispatch loop;
//! - [`subscription`]: cancellation handles.

mod builder;
mod bus;
mod config;
mod entry;
pub mod global;
mod registry;
mod subscription;

pub use builder::BusBuilder;
pub use bus::Bus;
pub use config::Config;
pub use subscription::{Subscription, SubscriptionGuard};
