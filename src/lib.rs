//! # relaybus
//!
//! **relaybus** is a typed, priority-ordered, in-process publish/subscribe bus.
//!
//! Producers publish a payload on a [`Channel`]; every listener registered on
//! that channel is invoked synchronously on the publishing thread, in priority
//! order. Listeners may be one-shot, may be bound to the lifetime of an owner
//! object, and may subscribe or unsubscribe while a dispatch is in flight.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   Producer                                   Host code
//!      │ publish(&CHANNEL, &payload)              │ subscribe / subscribe_once
//!      ▼                                          ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bus                                                              │
//! │  - persistent Registry   key ─► Bucket<T> ─► [Entry, Entry, ...]  │
//! │  - one-shot Registry     key ─► Bucket<T> ─► [Entry, ...]         │
//! │  - Report (failure sink, default: LogReporter via `tracing`)      │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ snapshot (Arc clone) ──► invoke in tier order
//!        ▼
//!   Critical ─► High ─► Normal ─► Low ─► Background
//!        │
//!        ├─ panic / Err   ─► ListenerFailure ─► Report::on_failure
//!        ├─ owner expired ─► skipped, pruned ─► Report::on_expired
//!        └─ one-shot      ─► pruned after its single invocation
//! ```
//!
//! ### Lifecycle of one registration
//! ```text
//! subscribe ──► Registered ──► (publish, persistent) ──► Registered
//!                   │
//!                   ├──► (publish, one-shot)        ──► Removed
//!                   ├──► (owner expired)            ──► Removed
//!                   └──► (dispose / unsubscribe)    ──► Removed
//! ```
//! `Removed` is terminal: disposing again or publishing again never revives it.
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Channels**      | Named topics with a compile-time payload type.                | [`Channel`]                                 |
//! | **Listeners**     | Shared callbacks with identity, priority tiers, owner binding.| [`Listener`], [`Priority`], [`Lifetime`]    |
//! | **Bus**           | Registration, dispatch, removal, introspection.               | [`Bus`], [`SubscribeOptions`]               |
//! | **Subscriptions** | Single-use cancellation handles, optional RAII guard.         | [`Subscription`], [`SubscriptionGuard`]     |
//! | **Reporting**     | Injectable sink for listener failures and expired owners.     | [`Report`], [`LogReporter`]                 |
//! | **Errors**        | Typed errors for API misuse and listener failures.            | [`BusError`], [`ListenerError`]             |
//! | **Configuration** | Bus name and default priority.                                | [`Config`], [`BusBuilder`]                  |
//!
//! ## Optional features
//! - `async` _(default)_: [`Bus::publish_async`] / [`Bus::notify_async`] run dispatch
//!   on tokio's blocking pool.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use relaybus::{Bus, Channel, Priority, SubscribeOptions};
//!
//! const SCORE: Channel<u32> = Channel::constant("score.changed");
//! const GAME_OVER: Channel<()> = Channel::constant("game.over");
//!
//! fn main() -> Result<(), relaybus::BusError> {
//!     let bus = Bus::new();
//!     let total = Arc::new(AtomicU32::new(0));
//!
//!     // Persistent listener, bound to the lifetime of `hud`.
//!     let hud = Arc::new("hud");
//!     let t = Arc::clone(&total);
//!     bus.subscribe_with(
//!         &SCORE,
//!         move |score: &u32| { t.fetch_add(*score, Ordering::SeqCst); },
//!         SubscribeOptions::new().with_priority(Priority::High).with_owner(&hud),
//!     )?;
//!
//!     // One-shot listener on a parameterless channel.
//!     bus.subscribe_once(&GAME_OVER, |_: &()| println!("game over"))?;
//!
//!     bus.publish(&SCORE, &10);
//!     drop(hud);                 // the listener is skipped and pruned from now on
//!     bus.publish(&SCORE, &5);
//!     bus.notify(&GAME_OVER);
//!     bus.notify(&GAME_OVER);   // nobody left to hear it
//!
//!     assert_eq!(total.load(Ordering::SeqCst), 10);
//!     assert!(!bus.has_listeners(&SCORE));
//!     Ok(())
//! }
//! ```
mod channels;
mod engine;
mod error;
mod listeners;
mod reporters;

// ---- Public re-exports ----

pub use channels::Channel;
pub use engine::{Bus, BusBuilder, Config, Subscription, SubscriptionGuard, global};
pub use error::{BusError, ListenerError};
pub use listeners::{IntoListener, Lifetime, Listener, ListenerId, Priority, SubscribeOptions};
pub use reporters::{ListenerFailure, LogReporter, Report};
