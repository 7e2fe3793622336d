//! # Listener model.
//!
//! This module provides the pieces a registration is made of:
//! - [`Listener`] - shared callback with identity (`Arc`-backed, cheap to clone)
//! - [`Priority`] - five dispatch tiers, `Critical` first
//! - [`Lifetime`] - non-owning liveness probe binding a listener to an owner
//! - [`SubscribeOptions`] - priority + optional lifetime for one registration
//! - [`ListenerId`] - unique id of one registration

mod lifetime;
mod listener;
mod options;
mod priority;

pub use lifetime::Lifetime;
pub use listener::{IntoListener, Listener, ListenerId};
pub use options::SubscribeOptions;
pub use priority::Priority;
