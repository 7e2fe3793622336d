//! # Owner-bound listeners.
//!
//! A [`Lifetime`] answers one question: is the owner of a listener still alive?
//! The bus asks it before **every** invocation and never caches the answer.
//! Holding a `Lifetime` must not keep the owner alive.
//!
//! Built-in implementations:
//! - [`std::sync::Weak<T>`] - alive while any `Arc<T>` exists;
//! - [`CancellationToken`] - alive until cancelled. An owner can hold
//!   `token.clone().drop_guard()` so the binding ends when the owner is dropped.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use relaybus::Lifetime;
//!
//! let owner = Arc::new("hud");
//! let probe = Arc::downgrade(&owner);
//! assert!(probe.is_alive());
//! drop(owner);
//! assert!(!probe.is_alive());
//! ```

use std::sync::Weak;

use tokio_util::sync::CancellationToken;

/// Non-owning liveness probe for an owner object.
pub trait Lifetime: Send + Sync + 'static {
    /// Returns `true` while the owner is alive.
    ///
    /// Once this returns `false` the listener is pruned and never invoked again.
    fn is_alive(&self) -> bool;
}

impl<T> Lifetime for Weak<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    #[inline]
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }
}

impl Lifetime for CancellationToken {
    #[inline]
    fn is_alive(&self) -> bool {
        !self.is_cancelled()
    }
}
